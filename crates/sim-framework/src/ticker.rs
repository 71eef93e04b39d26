//! # Clock / Ticker
//!
//! A cancellable periodic timer used by every actor run loop.
//!
//! The sleep between ticks is the only suspension point of a loop, and therefore
//! the only place where a cancellation request is observed. Work done between two
//! ticks always runs to completion.
//!
//! ```rust
//! use std::time::Duration;
//! use sim_framework::ticker::Ticker;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() {
//!     let token = CancellationToken::new();
//!     let mut ticker = Ticker::new(Duration::from_millis(1000), token.clone());
//!
//!     assert!(ticker.tick().await);
//!     token.cancel();
//!     assert!(!ticker.tick().await);
//!     assert_eq!(ticker.ticks(), 1);
//! }
//! ```

use crate::error::Cancelled;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Periodic timer bound to one run's cancellation token.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    token: CancellationToken,
    ticks: u64,
}

impl Ticker {
    pub fn new(period: Duration, token: CancellationToken) -> Self {
        Self {
            period,
            token,
            ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of periods that elapsed without cancellation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Sleeps for one period.
    ///
    /// Returns `false` when the run was cancelled before or during the sleep;
    /// the caller is expected to leave its loop.
    pub async fn tick(&mut self) -> bool {
        match sleep_or_cancel(self.period, &self.token).await {
            Ok(()) => {
                self.ticks += 1;
                true
            }
            Err(Cancelled) => false,
        }
    }
}

/// One-shot cancellable wait.
pub async fn sleep_or_cancel(duration: Duration, token: &CancellationToken) -> Result<(), Cancelled> {
    if token.is_cancelled() {
        return Err(Cancelled);
    }
    tokio::select! {
        _ = token.cancelled() => Err(Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
