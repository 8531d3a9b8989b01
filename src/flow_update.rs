use std::collections::{BTreeMap, BTreeSet};

use crate::graph::EdgeId;
use crate::state::CycleEdge;

pub trait FlowUpdater {
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        flows: &BTreeMap<EdgeId, f64>,
        basis_edges: &BTreeSet<EdgeId>,
        non_basis_edges: &BTreeSet<EdgeId>,
        cycle: &[CycleEdge],
        theta: f64,
        leaving_edge: &EdgeId,
        entering_edge: &EdgeId,
    ) -> (BTreeMap<EdgeId, f64>, BTreeSet<EdgeId>, BTreeSet<EdgeId>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFlowUpdater;

impl FlowUpdater for DefaultFlowUpdater {
    fn execute(
        &self,
        flows: &BTreeMap<EdgeId, f64>,
        basis_edges: &BTreeSet<EdgeId>,
        non_basis_edges: &BTreeSet<EdgeId>,
        cycle: &[CycleEdge],
        theta: f64,
        leaving_edge: &EdgeId,
        entering_edge: &EdgeId,
    ) -> (BTreeMap<EdgeId, f64>, BTreeSet<EdgeId>, BTreeSet<EdgeId>) {
        let mut flows = flows.clone();
        for cycle_edge in cycle {
            let delta = cycle_edge.sign.apply(theta);
            *flows.entry(cycle_edge.edge.clone()).or_insert(0.0) += delta;
        }

        let mut basis_edges = basis_edges.clone();
        let mut non_basis_edges = non_basis_edges.clone();

        // degenerate pivot: entering edge is its own bottleneck, flips bound without joining the basis
        if leaving_edge != entering_edge {
            basis_edges.remove(leaving_edge);
            basis_edges.insert(entering_edge.clone());
            non_basis_edges.remove(entering_edge);
            non_basis_edges.insert(leaving_edge.clone());
        }

        (flows, basis_edges, non_basis_edges)
    }
}
