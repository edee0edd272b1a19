//! Randomness: breeding picks and request jitter

use std::time::Duration;

use farm_domain::UnitPicker;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::DelayRange;

/// Uniform picker for random breeding
///
/// Uses `StdRng` so the cycle future stays `Send`.
#[derive(Debug)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitPicker for RandomPicker {
    fn pick(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        self.rng.gen_range(0..upper)
    }
}

/// Random duration inside `range` (seconds, inclusive)
pub fn jitter(range: DelayRange) -> Duration {
    let (min, max) = range.bounds();
    if min == max {
        return Duration::from_secs(min);
    }
    Duration::from_secs(rand::thread_rng().gen_range(min..=max))
}
