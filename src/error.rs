use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("infeasible: {0}")]
    Infeasible(String),

    #[error("iteration limit exceeded after {0} pivots")]
    IterationLimit(usize),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
