use std::collections::{BTreeMap, BTreeSet};

use crate::constants::EPSILON;
use crate::engine::{Strategies, TransportSolver};
use crate::error::Error;
use crate::graph::{EdgeId, Graph};

#[derive(Debug, Clone)]
pub struct BasisResult {
    pub basis_edges: BTreeSet<EdgeId>,
    pub non_basis_edges: BTreeSet<EdgeId>,
    pub flows: BTreeMap<EdgeId, f64>,
}

pub trait Initializer {
    fn execute(&self, graph: &Graph) -> Result<BasisResult, Error>;
}

// bypasses Phase 1; also used to solve the Phase-1 auxiliary problem itself
#[derive(Debug, Clone)]
pub struct PrebuiltInitializer {
    pub basis_edges: BTreeSet<EdgeId>,
    pub non_basis_edges: BTreeSet<EdgeId>,
    pub flows: BTreeMap<EdgeId, f64>,
}

impl Initializer for PrebuiltInitializer {
    fn execute(&self, _graph: &Graph) -> Result<BasisResult, Error> {
        Ok(BasisResult {
            basis_edges: self.basis_edges.clone(),
            non_basis_edges: self.non_basis_edges.clone(),
            flows: self.flows.clone(),
        })
    }
}

// builds an artificial-root auxiliary graph, solves it with a nested
// engine, then extracts a feasible basis for the original problem
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPhaseInitializer;

impl Initializer for TwoPhaseInitializer {
    fn execute(&self, graph: &Graph) -> Result<BasisResult, Error> {
        if !graph.check_balance_feasibility() {
            return Err(Error::Infeasible("balance".to_string()));
        }

        let root_id = fresh_root_id(graph);
        let mut aux = Graph::new();
        for node in graph.nodes() {
            aux.add_node(node.id.clone(), node.balance)?;
        }
        aux.add_node(root_id.clone(), 0.0)?;
        for edge in graph.edges() {
            // auxiliary cost vector is 0 on every original edge.
            aux.add_edge(edge.from.clone(), edge.to.clone(), 0.0, edge.capacity)?;
        }

        let mut artificial_edges = BTreeSet::new();
        let mut aux_flows = BTreeMap::new();
        for node in graph.nodes() {
            if node.balance > EPSILON {
                aux.add_edge(node.id.clone(), root_id.clone(), 1.0, f64::INFINITY)?;
                let id = EdgeId::new(node.id.clone(), root_id.clone());
                aux_flows.insert(id.clone(), node.balance);
                artificial_edges.insert(id);
            } else if node.balance < -EPSILON {
                aux.add_edge(root_id.clone(), node.id.clone(), 1.0, f64::INFINITY)?;
                let id = EdgeId::new(root_id.clone(), node.id.clone());
                aux_flows.insert(id.clone(), -node.balance);
                artificial_edges.insert(id);
            } else {
                // transit node: still attached to the root (unlike
                // source/sink edges its initial flow is zero) so the
                // initial basis spans every node, not just sources and
                // sinks. Capacity is +inf, matching source/sink
                // artificial edges, so it never sits at both bounds at
                // once — a zero-capacity edge would, and that coincidence
                // is what makes a degenerate pivot cycle forever.
                aux.add_edge(node.id.clone(), root_id.clone(), 1.0, f64::INFINITY)?;
                artificial_edges.insert(EdgeId::new(node.id.clone(), root_id.clone()));
            }
        }

        let non_basis_edges: BTreeSet<EdgeId> =
            aux.edge_ids().difference(&artificial_edges).cloned().collect();

        let mut strategies = Strategies::default();
        strategies.initializer = Box::new(PrebuiltInitializer {
            basis_edges: artificial_edges,
            non_basis_edges,
            flows: aux_flows,
        });

        let mut nested = TransportSolver::with_strategies(aux, strategies);
        nested.solve_step_by_step()?;

        let final_state = nested.current_state();
        if final_state.objective_value > EPSILON {
            return Err(Error::Infeasible("no feasible flow".to_string()));
        }

        extract_original_basis(graph, &final_state.basis_edges, &final_state.flows)
    }
}

fn fresh_root_id(graph: &Graph) -> String {
    let mut candidate = "root".to_string();
    while graph.node(&candidate).is_some() {
        candidate.push('_');
    }
    candidate
}

fn extract_original_basis(
    graph: &Graph,
    aux_basis: &BTreeSet<EdgeId>,
    aux_flows: &BTreeMap<EdgeId, f64>,
) -> Result<BasisResult, Error> {
    let original_ids = graph.edge_ids();
    let mut basis: BTreeSet<EdgeId> = aux_basis.intersection(&original_ids).cloned().collect();
    let flows: BTreeMap<EdgeId, f64> =
        original_ids.iter().map(|id| (id.clone(), aux_flows.get(id).copied().unwrap_or(0.0))).collect();

    let mut uf = UnionFind::new(graph.node_ids());
    for id in &basis {
        uf.union(&id.from, &id.to);
    }

    let mut needed = graph.num_nodes().saturating_sub(1).saturating_sub(basis.len());
    if needed > 0 {
        for id in original_ids.difference(&basis) {
            if needed == 0 {
                break;
            }
            if uf.find(&id.from) != uf.find(&id.to) {
                uf.union(&id.from, &id.to);
                basis.insert(id.clone());
                needed -= 1;
            }
        }
    }

    if needed > 0 {
        return Err(Error::Infeasible("no feasible flow".to_string()));
    }

    let non_basis_edges = original_ids.difference(&basis).cloned().collect();
    Ok(BasisResult { basis_edges: basis, non_basis_edges, flows })
}

struct UnionFind {
    parent: BTreeMap<String, String>,
}

impl UnionFind {
    fn new<'a>(ids: impl Iterator<Item = &'a String>) -> Self {
        let parent = ids.map(|id| (id.clone(), id.clone())).collect();
        Self { parent }
    }

    fn find(&mut self, id: &str) -> String {
        let parent = self.parent.get(id).cloned().unwrap_or_else(|| id.to_string());
        if parent == id {
            parent
        } else {
            let root = self.find(&parent);
            self.parent.insert(id.to_string(), root.clone());
            root
        }
    }

    fn union(&mut self, a: &str, b: &str) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent.insert(ra, rb);
        }
    }
}
