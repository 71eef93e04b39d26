//! The loader capability seen by other actors.

use super::error::LoaderError;
use crate::model::{Material, Notification};
use sim_framework::Subscription;

/// What a worker needs from a loader: arm it, fire it, watch it.
///
/// Workers hold an `Arc<dyn MaterialLoader>` handed to them at start-time, never
/// the concrete [`Loader`](super::Loader), so any implementation can be tended.
pub trait MaterialLoader: Send + Sync {
    fn name(&self) -> &str;

    fn is_loading(&self) -> bool;

    /// Records the pending request without starting work.
    fn request_load(&self, material: Material, quantity: u32) -> Result<(), LoaderError>;

    /// Starts the timed load. A no-op if already loading.
    fn start_loading(&self);

    /// Records the request and starts loading as one step. Returns `Ok(false)`
    /// without touching the pending request when the loader is already busy.
    fn try_dispatch(&self, material: Material, quantity: u32) -> Result<bool, LoaderError>;

    /// Cancels an in-flight load. A no-op if idle.
    fn stop_loading(&self);

    /// Notification stream; [`Notification::Loaded`] marks a finished load.
    fn subscribe(&self) -> Subscription<Notification>;
}
