//! # Generation Module
//!
//! Daily forage generation: the spawn rules a configuration supplies and the
//! evaluator that turns them into placements.
//!
//! Each in-game morning the host builds a [`SpawnConfig`] (or reuses one),
//! derives that day's random generator with [`utils::create_rng`] and runs
//! [`SpawnEvaluator::spawn_day`] against every location. The same seed, day
//! and terrain always produce the same placements, which keeps the host's
//! placement authoritative and test fixtures reproducible.

pub mod evaluator;
pub mod rules;

pub use evaluator::*;
pub use rules::*;

/// Utility functions for generation.
pub mod utils {
    use super::SpawnConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates the seeded random number generator for one in-game day.
    ///
    /// # Examples
    ///
    /// ```
    /// use forage::{utils, SpawnConfig};
    /// use rand::Rng;
    ///
    /// let config = SpawnConfig::new(12345);
    /// let a: u64 = utils::create_rng(&config, 3).gen();
    /// let b: u64 = utils::create_rng(&config, 3).gen();
    /// assert_eq!(a, b);
    /// ```
    pub fn create_rng(config: &SpawnConfig, day: u32) -> StdRng {
        StdRng::seed_from_u64(config.seed_for_day(day))
    }
}
