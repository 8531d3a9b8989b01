use crate::engine::TransportSolver;
use crate::error::Error;
use crate::graph::Graph;
use crate::state::SolutionState;

pub struct SolverController {
    graph: Graph,
    solver: TransportSolver,
    cursor: usize,
}

impl SolverController {
    pub fn new(graph: Graph) -> Self {
        let solver = TransportSolver::new(graph.clone());
        Self { graph, solver, cursor: 0 }
    }

    pub fn next_step(&mut self) -> Result<bool, Error> {
        if self.cursor + 1 < self.solver.history().len() {
            self.cursor += 1;
            return Ok(true);
        }
        if self.solver.is_solved() {
            return Ok(false);
        }
        let advanced = self.solver.step()?;
        if advanced {
            self.cursor = self.solver.history().len() - 1;
        }
        Ok(advanced)
    }

    pub fn previous_step(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn solve_all(&mut self) -> Result<(), Error> {
        self.solver.solve_step_by_step()?;
        self.cursor = self.solver.history().len() - 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.solver = TransportSolver::new(self.graph.clone());
        self.cursor = 0;
    }

    pub fn can_go_next(&self) -> bool {
        self.cursor + 1 < self.solver.history().len() || !self.solver.is_solved()
    }

    pub fn can_go_previous(&self) -> bool {
        self.cursor > 0
    }

    pub fn is_started(&self) -> bool {
        self.cursor > 0 || self.solver.history().len() > 1
    }

    pub fn is_solved(&self) -> bool {
        self.solver.is_solved()
    }

    pub fn get_current_state(&self) -> &SolutionState {
        &self.solver.history()[self.cursor]
    }

    pub fn get_all_states(&self) -> &[SolutionState] {
        self.solver.history()
    }
}
