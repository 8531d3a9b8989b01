// tolerance for every comparison against zero or a bound
pub const EPSILON: f64 = 1e-9;

pub const MAX_ITERATIONS: usize = 1000;
