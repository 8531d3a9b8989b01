use std::collections::{BTreeMap, BTreeSet};

use crate::constants::EPSILON;
use crate::graph::{EdgeId, Graph};
use crate::state::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimalityResult {
    pub is_optimal: bool,
    pub deltas: BTreeMap<EdgeId, f64>,
    pub entering_edge: Option<EdgeId>,
    pub improvement_direction: Option<Direction>,
    pub violation_score: f64,
}

pub trait OptimalityChecker {
    fn execute(
        &self,
        graph: &Graph,
        non_basis_edges: &BTreeSet<EdgeId>,
        potentials: &BTreeMap<String, f64>,
        flows: &BTreeMap<EdgeId, f64>,
    ) -> OptimalityResult;
}

// enters the non-basis edge with maximum |delta|, ties broken by edge id
#[derive(Debug, Clone, Copy, Default)]
pub struct DantzigOptimalityChecker;

impl OptimalityChecker for DantzigOptimalityChecker {
    fn execute(
        &self,
        graph: &Graph,
        non_basis_edges: &BTreeSet<EdgeId>,
        potentials: &BTreeMap<String, f64>,
        flows: &BTreeMap<EdgeId, f64>,
    ) -> OptimalityResult {
        let mut deltas = BTreeMap::new();
        let mut entering_edge = None;
        let mut improvement_direction = None;
        let mut best_score = 0.0;

        // `non_basis_edges` is a `BTreeSet`, so this already iterates in
        // lexicographic edge-id order; a strict `>` below keeps the
        // first (smallest id) edge on a tie.
        for id in non_basis_edges {
            let edge = match graph.edge(id) {
                Some(e) => e,
                None => continue,
            };
            let u_from = potentials.get(&edge.from).copied().unwrap_or(0.0);
            let u_to = potentials.get(&edge.to).copied().unwrap_or(0.0);
            let delta = u_to - u_from - edge.cost;
            deltas.insert(id.clone(), delta);

            let flow = flows.get(id).copied().unwrap_or(0.0);
            let at_lower = flow <= EPSILON;
            let at_upper = (edge.capacity - flow) <= EPSILON;

            let violation = if at_lower && delta > EPSILON {
                Some((delta, Direction::Increase))
            } else if at_upper && delta < -EPSILON {
                Some((-delta, Direction::Decrease))
            } else {
                None
            };

            if let Some((score, direction)) = violation {
                if score > best_score {
                    best_score = score;
                    entering_edge = Some(id.clone());
                    improvement_direction = Some(direction);
                }
            }
        }

        OptimalityResult {
            is_optimal: entering_edge.is_none(),
            deltas,
            entering_edge,
            improvement_direction,
            violation_score: best_score,
        }
    }
}
