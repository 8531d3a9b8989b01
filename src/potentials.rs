use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::Error;
use crate::graph::{EdgeId, Graph};

pub trait PotentialCalculator {
    fn execute(&self, graph: &Graph, basis_edges: &BTreeSet<EdgeId>) -> Result<BTreeMap<String, f64>, Error>;
}

// BFS over the basis as an undirected graph, rooted at the smallest node id
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsPotentialCalculator;

impl PotentialCalculator for BfsPotentialCalculator {
    fn execute(&self, graph: &Graph, basis_edges: &BTreeSet<EdgeId>) -> Result<BTreeMap<String, f64>, Error> {
        if basis_edges.len() + 1 != graph.num_nodes() {
            return Err(Error::InvariantViolation(format!(
                "basis has {} edges but graph has {} nodes; expected a spanning tree",
                basis_edges.len(),
                graph.num_nodes()
            )));
        }

        // undirected adjacency: neighbor, cost of (from,to), and whether
        // `from` is the node we're standing on (i.e. we'd cross forward).
        let mut adj: BTreeMap<&str, Vec<(&str, f64, bool)>> = BTreeMap::new();
        for id in basis_edges {
            let edge = graph.edge(id).ok_or_else(|| Error::InvariantViolation(format!("basis edge {id} not in graph")))?;
            adj.entry(&edge.from).or_default().push((&edge.to, edge.cost, true));
            adj.entry(&edge.to).or_default().push((&edge.from, edge.cost, false));
        }

        let root = graph
            .root_candidate()
            .ok_or_else(|| Error::InvariantViolation("graph has no nodes".to_string()))?;

        let mut potentials = BTreeMap::new();
        potentials.insert(root.to_string(), 0.0);
        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(u) = queue.pop_front() {
            let u_potential = potentials[u];
            if let Some(neighbors) = adj.get(u) {
                for &(v, cost, forward) in neighbors {
                    if potentials.contains_key(v) {
                        continue;
                    }
                    let v_potential = if forward { u_potential + cost } else { u_potential - cost };
                    potentials.insert(v.to_string(), v_potential);
                    queue.push_back(v);
                }
            }
        }

        if potentials.len() != graph.num_nodes() {
            return Err(Error::InvariantViolation("basis is not connected; cannot assign potentials".to_string()));
        }

        Ok(potentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_zero_to_the_root_and_propagates_cost() {
        let mut g = Graph::new();
        g.add_node("a", 1.0).unwrap();
        g.add_node("b", 0.0).unwrap();
        g.add_node("c", -1.0).unwrap();
        g.add_edge("a", "b", 3.0, f64::INFINITY).unwrap();
        g.add_edge("c", "b", 2.0, f64::INFINITY).unwrap();

        let basis = [EdgeId::new("a", "b"), EdgeId::new("c", "b")].into_iter().collect();
        let potentials = BfsPotentialCalculator.execute(&g, &basis).unwrap();

        assert_eq!(potentials["a"], 0.0);
        assert_eq!(potentials["b"], 3.0);
        assert_eq!(potentials["c"], 1.0);
    }

    #[test]
    fn rejects_a_basis_of_the_wrong_size() {
        let mut g = Graph::new();
        g.add_node("a", 1.0).unwrap();
        g.add_node("b", 0.0).unwrap();
        g.add_node("c", -1.0).unwrap();
        g.add_edge("a", "b", 1.0, f64::INFINITY).unwrap();

        let basis = [EdgeId::new("a", "b")].into_iter().collect();
        assert!(matches!(BfsPotentialCalculator.execute(&g, &basis), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn rejects_a_basis_that_is_the_right_size_but_not_a_tree() {
        let mut g = Graph::new();
        g.add_node("a", 1.0).unwrap();
        g.add_node("b", 0.0).unwrap();
        g.add_node("c", 0.0).unwrap();
        g.add_node("d", -1.0).unwrap();
        g.add_edge("a", "b", 1.0, f64::INFINITY).unwrap();
        g.add_edge("b", "c", 1.0, f64::INFINITY).unwrap();
        g.add_edge("a", "c", 1.0, f64::INFINITY).unwrap();

        // a triangle among a/b/c has the right edge count (3 = 4 - 1)
        // but leaves d unreachable and contains a cycle instead of
        // spanning all four nodes.
        let basis = [EdgeId::new("a", "b"), EdgeId::new("b", "c"), EdgeId::new("a", "c")].into_iter().collect();
        assert!(matches!(BfsPotentialCalculator.execute(&g, &basis), Err(Error::InvariantViolation(_))));
    }
}
