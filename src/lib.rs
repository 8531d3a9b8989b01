//! Two-phase network simplex solver for minimum-cost capacitated
//! transportation problems.

pub mod constants;
pub mod controller;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod flow_update;
pub mod graph;
pub mod initializer;
pub mod optimality;
pub mod potentials;
pub mod state;
pub mod theta;

pub use constants::{EPSILON, MAX_ITERATIONS};
pub use controller::SolverController;
pub use engine::{Strategies, TransportSolver};
pub use error::Error;
pub use graph::{Edge, EdgeId, Graph, Node, NodeKind};
pub use state::{CycleEdge, Direction, Sign, SolutionState, StepType};
