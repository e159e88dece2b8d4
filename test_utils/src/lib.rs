pub mod fixtures;
pub mod rng;
