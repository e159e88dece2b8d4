use rand::{rngs::StdRng, SeedableRng};

pub const TEST_RNG_SEED: u64 = 1337;

/// A deterministic RNG so shuffled inputs are reproducible across runs.
pub fn rng() -> StdRng {
    StdRng::seed_from_u64(TEST_RNG_SEED)
}
