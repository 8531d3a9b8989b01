use tracing::{debug, trace};

use crate::constants::MAX_ITERATIONS;
use crate::cycle::{CycleFinder, DfsCycleFinder};
use crate::error::Error;
use crate::flow_update::{DefaultFlowUpdater, FlowUpdater};
use crate::graph::Graph;
use crate::initializer::{Initializer, TwoPhaseInitializer};
use crate::optimality::{DantzigOptimalityChecker, OptimalityChecker};
use crate::potentials::{BfsPotentialCalculator, PotentialCalculator};
use crate::state::{SolutionState, StepType};
use crate::theta::{MinRatioThetaCalculator, ThetaCalculator};

pub struct Strategies {
    pub initializer: Box<dyn Initializer>,
    pub potential_calculator: Box<dyn PotentialCalculator>,
    pub optimality_checker: Box<dyn OptimalityChecker>,
    pub cycle_finder: Box<dyn CycleFinder>,
    pub theta_calculator: Box<dyn ThetaCalculator>,
    pub flow_updater: Box<dyn FlowUpdater>,
}

impl Default for Strategies {
    fn default() -> Self {
        Self {
            initializer: Box::new(TwoPhaseInitializer),
            potential_calculator: Box::new(BfsPotentialCalculator),
            optimality_checker: Box::new(DantzigOptimalityChecker),
            cycle_finder: Box::new(DfsCycleFinder),
            theta_calculator: Box::new(MinRatioThetaCalculator),
            flow_updater: Box::new(DefaultFlowUpdater),
        }
    }
}

pub struct TransportSolver {
    graph: Graph,
    strategies: Strategies,
    history: Vec<SolutionState>,
}

impl TransportSolver {
    pub fn new(graph: Graph) -> Self {
        Self::with_strategies(graph, Strategies::default())
    }

    pub fn with_strategies(graph: Graph, strategies: Strategies) -> Self {
        Self { graph, strategies, history: vec![SolutionState::initial()] }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn history(&self) -> &[SolutionState] {
        &self.history
    }

    pub fn current_state(&self) -> &SolutionState {
        self.history.last().expect("history always has at least the initial state")
    }

    pub fn iteration(&self) -> u64 {
        self.current_state().iteration
    }

    pub fn is_solved(&self) -> bool {
        self.current_state().step_type == StepType::Optimal
    }

    // false iff already optimal
    pub fn step(&mut self) -> Result<bool, Error> {
        let last = self.current_state();

        let next = match last.step_type {
            StepType::Optimal => return Ok(false),

            StepType::Initial => {
                trace!("running initializer");
                let basis = self.strategies.initializer.execute(&self.graph)?;
                SolutionState {
                    step_type: StepType::InitialBasis,
                    iteration: 0,
                    objective_value: self.graph.objective(&basis.flows),
                    basis_edges: basis.basis_edges,
                    non_basis_edges: basis.non_basis_edges,
                    potentials: Default::default(),
                    deltas: Default::default(),
                    flows: basis.flows,
                    entering_edge: None,
                    leaving_edge: None,
                    improvement_direction: None,
                    cycle: Vec::new(),
                    theta: None,
                    description: "constructed an initial feasible basis".to_string(),
                }
            }

            StepType::InitialBasis | StepType::UpdateFlows => {
                let iteration =
                    if last.step_type == StepType::UpdateFlows { last.iteration + 1 } else { last.iteration };
                if iteration as usize > MAX_ITERATIONS {
                    return Err(Error::IterationLimit(MAX_ITERATIONS));
                }
                let potentials = self.strategies.potential_calculator.execute(&self.graph, &last.basis_edges)?;
                SolutionState {
                    step_type: StepType::CalculatePotentials,
                    iteration,
                    potentials,
                    objective_value: self.graph.objective(&last.flows),
                    basis_edges: last.basis_edges.clone(),
                    non_basis_edges: last.non_basis_edges.clone(),
                    deltas: Default::default(),
                    flows: last.flows.clone(),
                    entering_edge: None,
                    leaving_edge: None,
                    improvement_direction: None,
                    cycle: Vec::new(),
                    theta: None,
                    description: format!("computed potentials for iteration {iteration}"),
                }
            }

            StepType::CalculatePotentials => {
                let result = self.strategies.optimality_checker.execute(
                    &self.graph,
                    &last.non_basis_edges,
                    &last.potentials,
                    &last.flows,
                );
                let description = if result.is_optimal {
                    "no violating edge remains; solution is optimal".to_string()
                } else {
                    format!(
                        "selected entering edge {} ({})",
                        result.entering_edge.as_ref().unwrap(),
                        result.improvement_direction.unwrap().as_str()
                    )
                };
                let step_type = if result.is_optimal { StepType::Optimal } else { StepType::CheckOptimality };
                SolutionState {
                    step_type,
                    iteration: last.iteration,
                    deltas: result.deltas,
                    entering_edge: result.entering_edge,
                    improvement_direction: result.improvement_direction,
                    objective_value: self.graph.objective(&last.flows),
                    basis_edges: last.basis_edges.clone(),
                    non_basis_edges: last.non_basis_edges.clone(),
                    potentials: last.potentials.clone(),
                    flows: last.flows.clone(),
                    leaving_edge: None,
                    cycle: Vec::new(),
                    theta: None,
                    description,
                }
            }

            StepType::CheckOptimality => {
                let entering_edge = last
                    .entering_edge
                    .clone()
                    .ok_or_else(|| Error::InvariantViolation("no entering edge recorded".to_string()))?;
                let direction = last
                    .improvement_direction
                    .ok_or_else(|| Error::InvariantViolation("no improvement direction recorded".to_string()))?;
                let cycle = self.strategies.cycle_finder.execute(
                    &self.graph,
                    &last.basis_edges,
                    &entering_edge,
                    direction,
                    &last.flows,
                )?;
                SolutionState {
                    step_type: StepType::FindCycle,
                    iteration: last.iteration,
                    description: format!("found cycle of {} edges through {entering_edge}", cycle.len()),
                    cycle,
                    objective_value: self.graph.objective(&last.flows),
                    basis_edges: last.basis_edges.clone(),
                    non_basis_edges: last.non_basis_edges.clone(),
                    potentials: last.potentials.clone(),
                    deltas: last.deltas.clone(),
                    flows: last.flows.clone(),
                    entering_edge: Some(entering_edge),
                    leaving_edge: None,
                    improvement_direction: Some(direction),
                    theta: None,
                }
            }

            StepType::FindCycle => {
                let (theta, leaving_edge) = self.strategies.theta_calculator.execute(&last.cycle);
                SolutionState {
                    step_type: StepType::CalculateTheta,
                    iteration: last.iteration,
                    description: format!("theta = {theta}, leaving edge {leaving_edge}"),
                    theta: Some(theta),
                    leaving_edge: Some(leaving_edge),
                    objective_value: self.graph.objective(&last.flows),
                    basis_edges: last.basis_edges.clone(),
                    non_basis_edges: last.non_basis_edges.clone(),
                    potentials: last.potentials.clone(),
                    deltas: last.deltas.clone(),
                    flows: last.flows.clone(),
                    entering_edge: last.entering_edge.clone(),
                    improvement_direction: last.improvement_direction,
                    cycle: last.cycle.clone(),
                }
            }

            StepType::CalculateTheta => {
                let theta = last
                    .theta
                    .ok_or_else(|| Error::InvariantViolation("no theta recorded".to_string()))?;
                let leaving_edge = last
                    .leaving_edge
                    .clone()
                    .ok_or_else(|| Error::InvariantViolation("no leaving edge recorded".to_string()))?;
                let entering_edge = last
                    .entering_edge
                    .clone()
                    .ok_or_else(|| Error::InvariantViolation("no entering edge recorded".to_string()))?;
                let (flows, basis_edges, non_basis_edges) = self.strategies.flow_updater.execute(
                    &last.flows,
                    &last.basis_edges,
                    &last.non_basis_edges,
                    &last.cycle,
                    theta,
                    &leaving_edge,
                    &entering_edge,
                );
                SolutionState {
                    step_type: StepType::UpdateFlows,
                    iteration: last.iteration,
                    objective_value: self.graph.objective(&flows),
                    description: format!("applied theta={theta} along the cycle"),
                    flows,
                    basis_edges,
                    non_basis_edges,
                    potentials: last.potentials.clone(),
                    deltas: last.deltas.clone(),
                    entering_edge: None,
                    leaving_edge: None,
                    improvement_direction: None,
                    cycle: Vec::new(),
                    theta: None,
                }
            }
        };

        debug!(step_type = ?next.step_type, iteration = next.iteration, objective = next.objective_value, "{}", next.description);
        self.history.push(next);
        Ok(true)
    }

    pub fn solve_step_by_step(&mut self) -> Result<(), Error> {
        while !self.is_solved() {
            if !self.step()? {
                break;
            }
        }
        Ok(())
    }
}
