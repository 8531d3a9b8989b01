use std::collections::{BTreeMap, BTreeSet};

use crate::graph::EdgeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepType {
    Initial,
    InitialBasis,
    CalculatePotentials,
    CheckOptimality,
    FindCycle,
    CalculateTheta,
    UpdateFlows,
    Optimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Increase => "increase",
            Direction::Decrease => "decrease",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn as_char(&self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }

    pub fn apply(&self, theta: f64) -> f64 {
        match self {
            Sign::Plus => theta,
            Sign::Minus => -theta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleEdge {
    pub edge: EdgeId,
    pub sign: Sign,
    pub theta_limit: f64,
}

// every field not touched by the phase just executed is carried forward unchanged
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionState {
    pub step_type: StepType,
    pub iteration: u64,
    pub basis_edges: BTreeSet<EdgeId>,
    pub non_basis_edges: BTreeSet<EdgeId>,
    pub potentials: BTreeMap<String, f64>,
    pub deltas: BTreeMap<EdgeId, f64>,
    pub flows: BTreeMap<EdgeId, f64>,
    pub entering_edge: Option<EdgeId>,
    pub leaving_edge: Option<EdgeId>,
    pub improvement_direction: Option<Direction>,
    pub cycle: Vec<CycleEdge>,
    pub theta: Option<f64>,
    pub description: String,
    pub objective_value: f64,
}

impl SolutionState {
    pub fn initial() -> Self {
        SolutionState {
            step_type: StepType::Initial,
            iteration: 0,
            basis_edges: BTreeSet::new(),
            non_basis_edges: BTreeSet::new(),
            potentials: BTreeMap::new(),
            deltas: BTreeMap::new(),
            flows: BTreeMap::new(),
            entering_edge: None,
            leaving_edge: None,
            improvement_direction: None,
            cycle: Vec::new(),
            theta: None,
            description: "initial state".to_string(),
            objective_value: 0.0,
        }
    }
}
