//! # Random Source
//!
//! Actors draw timings and quantities through the [`RandomSource`] trait instead of
//! reaching for a global generator, so tests can inject a scripted sequence
//! (see [`crate::mock::ScriptedRandom`]).

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Shared handle to a random source, as stored by actors.
pub type SharedRandom = Arc<dyn RandomSource>;

/// A source of uniform draws.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[low, high)`. Returns `low` when the range is empty.
    fn range(&self, low: u64, high: u64) -> u64;

    /// Uniform float in `[0, 1)`.
    ///
    /// Test doubles may return exactly `1.0`, one past the range, to mean "never":
    /// [`chance`](RandomSource::chance) is then `false` for every `p <= 1.0`.
    fn unit(&self) -> f64;

    /// `true` with probability `p`.
    fn chance(&self, p: f64) -> bool {
        self.unit() < p
    }
}

/// Picks one element uniformly. `None` for an empty slice.
pub fn pick<'a, T>(random: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = random.range(0, items.len() as u64) as usize;
    items.get(index)
}

/// Entropy-seeded generator.
pub struct ThreadRandom {
    rng: Mutex<StdRng>,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn shared() -> SharedRandom {
        Arc::new(Self::new())
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn range(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        self.rng.lock().gen_range(low..high)
    }

    fn unit(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}

impl std::fmt::Debug for ThreadRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ThreadRandom")
    }
}
