use std::collections::{BTreeMap, BTreeSet};

use crate::error::Error;
use crate::graph::{EdgeId, Graph};
use crate::state::{CycleEdge, Direction, Sign};

pub trait CycleFinder {
    fn execute(
        &self,
        graph: &Graph,
        basis_edges: &BTreeSet<EdgeId>,
        entering_edge: &EdgeId,
        direction: Direction,
        flows: &BTreeMap<EdgeId, f64>,
    ) -> Result<Vec<CycleEdge>, Error>;
}

// undirected DFS from one endpoint of the entering edge to the other
#[derive(Debug, Clone, Copy, Default)]
pub struct DfsCycleFinder;

impl CycleFinder for DfsCycleFinder {
    fn execute(
        &self,
        graph: &Graph,
        basis_edges: &BTreeSet<EdgeId>,
        entering_edge: &EdgeId,
        direction: Direction,
        flows: &BTreeMap<EdgeId, f64>,
    ) -> Result<Vec<CycleEdge>, Error> {
        let a = entering_edge.from.as_str();
        let b = entering_edge.to.as_str();

        // undirected adjacency: neighbor, the basis edge used, whether
        // we'd be moving along that edge's stored (from -> to) direction.
        let mut adj: BTreeMap<&str, Vec<(&str, &EdgeId, bool)>> = BTreeMap::new();
        for id in basis_edges {
            adj.entry(id.from.as_str()).or_default().push((id.to.as_str(), id, true));
            adj.entry(id.to.as_str()).or_default().push((id.from.as_str(), id, false));
        }

        // DFS from a to b, recording (edge, traveled_forward) for each
        // step of the path actually taken.
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut path_edge: BTreeMap<&str, (&str, &EdgeId, bool)> = BTreeMap::new();
        visited.insert(a);
        let mut stack = vec![a];
        let mut found = a == b;
        while !found {
            let Some(u) = stack.pop() else { break };
            if let Some(neighbors) = adj.get(u) {
                for &(v, edge_id, forward) in neighbors {
                    if visited.contains(v) {
                        continue;
                    }
                    visited.insert(v);
                    path_edge.insert(v, (u, edge_id, forward));
                    if v == b {
                        found = true;
                        break;
                    }
                    stack.push(v);
                }
            }
        }

        if !found {
            return Err(Error::InvariantViolation(format!(
                "no tree path between {a} and {b}; basis is not connected"
            )));
        }

        // reconstruct the path a -> ... -> b as a list of
        // (edge, traveled_forward), in order of traversal.
        let mut forward_path: Vec<(EdgeId, bool)> = Vec::new();
        let mut cur = b;
        while cur != a {
            let (prev, edge_id, forward) = path_edge[cur];
            forward_path.push((edge_id.clone(), forward));
            cur = prev;
        }
        forward_path.reverse();

        let mut cycle = Vec::with_capacity(forward_path.len() + 1);
        let entering_flow = flows.get(entering_edge).copied().unwrap_or(0.0);
        let entering_cap = graph.edge(entering_edge).map(|e| e.capacity).unwrap_or(f64::INFINITY);

        match direction {
            Direction::Increase => {
                cycle.push(CycleEdge {
                    edge: entering_edge.clone(),
                    sign: Sign::Plus,
                    theta_limit: entering_cap - entering_flow,
                });
                // walk the path in reverse, b -> a; a step that was
                // forward (from -> to) while walking a -> b is now
                // against the arrow, so its sign flips to Minus.
                for (edge_id, forward) in forward_path.into_iter().rev() {
                    let flow = flows.get(&edge_id).copied().unwrap_or(0.0);
                    let cap = graph.edge(&edge_id).map(|e| e.capacity).unwrap_or(f64::INFINITY);
                    let sign = if forward { Sign::Minus } else { Sign::Plus };
                    let theta_limit = match sign {
                        Sign::Plus => cap - flow,
                        Sign::Minus => flow,
                    };
                    cycle.push(CycleEdge { edge: edge_id, sign, theta_limit });
                }
            }
            Direction::Decrease => {
                cycle.push(CycleEdge { edge: entering_edge.clone(), sign: Sign::Minus, theta_limit: entering_flow });
                // walk the path in its natural order, a -> b.
                for (edge_id, forward) in forward_path.into_iter() {
                    let flow = flows.get(&edge_id).copied().unwrap_or(0.0);
                    let cap = graph.edge(&edge_id).map(|e| e.capacity).unwrap_or(f64::INFINITY);
                    let sign = if forward { Sign::Plus } else { Sign::Minus };
                    let theta_limit = match sign {
                        Sign::Plus => cap - flow,
                        Sign::Minus => flow,
                    };
                    cycle.push(CycleEdge { edge: edge_id, sign, theta_limit });
                }
            }
        }

        Ok(cycle)
    }
}
