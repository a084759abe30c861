//! Seeded random number generation.
//!
//! Every stochastic engine owns its RNG. Engines built from a config use
//! [`create_rng`] on the config's seed; tests and drivers that need to share
//! a stream inject their own RNG through the `with_rng` constructors.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the crate's default RNG from a 64-bit seed.
///
/// The same seed always yields the same stream on the same platform.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from an optional seed, drawing a fresh seed when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}
