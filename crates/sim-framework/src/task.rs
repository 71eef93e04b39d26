//! # Task Slot
//!
//! Owns the background tasks launched by one actor.
//!
//! Each launch is a *run* with its own [`CancellationToken`] and a monotonically
//! increasing generation number. An actor stores the generation of its current
//! run next to its state flags; a finishing task compares generations with
//! [`TaskSlot::is_current`] before clearing flags, so a run that was stopped and
//! immediately replaced never clobbers the state of its successor.

use crate::error::FrameworkError;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

struct Run {
    generation: u64,
    token: CancellationToken,
}

/// Launch/cancel/join bookkeeping for one actor.
pub struct TaskSlot {
    label: String,
    generation: AtomicU64,
    current: Mutex<Option<Run>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskSlot {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawns `task` with a fresh cancellation token and returns the new generation.
    ///
    /// Any previous run is cancelled first. Must be called from within a Tokio runtime.
    pub fn launch<F, Fut>(&self, task: F) -> u64
    where
        F: FnOnce(u64, CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = self.current.lock().replace(Run {
            generation,
            token: token.clone(),
        }) {
            previous.token.cancel();
        }

        let handle = tokio::spawn(task(generation, token));
        let mut handles = self.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
        debug!(task = %self.label, generation, live = handles.len(), "Launched");
        generation
    }

    /// Signals the current run to stop at its next suspension point.
    pub fn cancel(&self) {
        if let Some(run) = self.current.lock().as_ref() {
            debug!(task = %self.label, generation = run.generation, "Cancel requested");
            run.token.cancel();
        }
    }

    /// Whether `generation` is still the latest run launched through this slot.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Number of launched tasks that have not finished yet.
    pub fn live_tasks(&self) -> usize {
        self.handles.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Waits for every task launched so far.
    ///
    /// All handles are awaited even if one of them failed; the first failure is returned.
    pub async fn join(&self) -> Result<(), FrameworkError> {
        let handles: Vec<_> = std::mem::take(&mut *self.handles.lock());
        let mut outcome = Ok(());
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(task = %self.label, error = %e, "Task failed");
                if outcome.is_ok() {
                    outcome = Err(FrameworkError::TaskFailed {
                        label: self.label.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcome
    }
}

impl std::fmt::Debug for TaskSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskSlot")
            .field("label", &self.label)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("live_tasks", &self.live_tasks())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::Ticker;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_cancel_then_join_leaves_no_live_tasks() {
        let slot = TaskSlot::new("looper");
        let ticks = Arc::new(AtomicUsize::new(0));

        let counter = ticks.clone();
        slot.launch(move |_, token| async move {
            let mut ticker = Ticker::new(Duration::from_millis(100), token);
            while ticker.tick().await {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(350)).await;
        slot.cancel();
        slot.join().await.unwrap();

        assert_eq!(slot.live_tasks(), 0);
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_relaunch_advances_generation() {
        let slot = TaskSlot::new("one-shot");

        let first = slot.launch(|_, token| async move { token.cancelled().await });
        assert!(slot.is_current(first));

        let second = slot.launch(|_, _| async {});
        assert_eq!(second, first + 1);
        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));

        // The first run was cancelled by the relaunch.
        slot.join().await.unwrap();
        assert_eq!(slot.live_tasks(), 0);
    }

    #[tokio::test]
    async fn test_join_reports_panicked_task() {
        let slot = TaskSlot::new("faulty");
        slot.launch(|_, _| async { panic!("boom") });

        let result = slot.join().await;
        assert!(matches!(result, Err(FrameworkError::TaskFailed { label, .. }) if label == "faulty"));
    }
}
