//! # Test Helpers
//!
//! Simulation actors are driven by timers and random draws, which makes them awkward to
//! test directly. This module provides the two pieces that make them deterministic:
//!
//! | Helper | Replaces | Use Case |
//! |--------|----------|----------|
//! | [`ScriptedRandom`] | [`ThreadRandom`](crate::random::ThreadRandom) | Fix durations, quantities and probabilistic branches |
//! | [`expect_event`] / [`drain`] | Manual `recv` loops | Assert on notifications with a timeout |
//!
//! Combine them with `#[tokio::test(start_paused = true)]`: the Tokio clock then only
//! advances when every task is idle, so a one-second tick costs no wall time.
//!
//! ```rust
//! use std::time::Duration;
//! use sim_framework::events::EventBus;
//! use sim_framework::mock::{expect_event, ScriptedRandom};
//! use sim_framework::random::RandomSource;
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() {
//!     let random = ScriptedRandom::new([4, 2]);
//!     assert_eq!(random.range(0, 10), 4);
//!     assert_eq!(random.range(0, 10), 2);
//!     // Exhausted scripts fall back to the range minimum.
//!     assert_eq!(random.range(3, 10), 3);
//!
//!     let bus = EventBus::new("probe");
//!     let mut sub = bus.subscribe();
//!     bus.publish(1u32);
//!     bus.publish(2u32);
//!
//!     let hit = expect_event(&mut sub, Duration::from_secs(1), |n| *n == 2).await;
//!     assert_eq!(hit, Some(2));
//! }
//! ```

use crate::events::Subscription;
use crate::random::{RandomSource, SharedRandom};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Deterministic [`RandomSource`] that replays fixed values.
///
/// Integers are clamped into the requested range. Once the integer script is
/// exhausted every draw returns the range minimum; once the unit script is
/// exhausted every draw returns `1.0`. That value lies outside the `[0, 1)`
/// range of real sources, so [`RandomSource::chance`] never fires,
/// not even for `p = 1.0`.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    values: Mutex<VecDeque<u64>>,
    units: Mutex<VecDeque<f64>>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
            units: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_units(self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.lock().extend(units);
        self
    }

    pub fn shared(self) -> SharedRandom {
        Arc::new(self)
    }

    pub fn remaining(&self) -> usize {
        self.values.lock().len()
    }
}

impl RandomSource for ScriptedRandom {
    fn range(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        match self.values.lock().pop_front() {
            Some(v) => v.clamp(low, high - 1),
            None => low,
        }
    }

    fn unit(&self) -> f64 {
        self.units.lock().pop_front().unwrap_or(1.0)
    }
}

/// Receives events until one satisfies `predicate`, skipping the others.
///
/// Returns `None` if the timeout elapses or the bus goes away first.
pub async fn expect_event<E>(
    subscription: &mut Subscription<E>,
    timeout: Duration,
    mut predicate: impl FnMut(&E) -> bool,
) -> Option<E> {
    tokio::time::timeout(timeout, async {
        while let Some(event) = subscription.recv().await {
            if predicate(&event) {
                return Some(event);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

/// Collects every event that is already queued, without waiting.
pub fn drain<E>(subscription: &mut Subscription<E>) -> Vec<E> {
    let mut events = Vec::new();
    while let Some(event) = subscription.try_recv() {
        events.push(event);
    }
    events
}
