//! # Actor Lifecycle
//!
//! The contract every simulated actor exposes to its orchestrator.
//!
//! Unlike a mailbox actor, a simulation actor keeps its state behind its own
//! exclusivity guard and launches background runs from its lifecycle calls. The
//! orchestrator only needs to know how to stop it and how to wait until its
//! background work is really gone; that is what [`SimActor`] captures.

use crate::error::FrameworkError;
use async_trait::async_trait;

#[async_trait]
pub trait SimActor: Send + Sync {
    /// Human readable name, unique within a plant.
    fn name(&self) -> &str;

    /// Whether the actor's run flag (running/busy/working) is currently set.
    fn is_active(&self) -> bool;

    /// The actor's Stop operation. A no-op if nothing is running.
    fn halt(&self);

    /// Waits for every background task the actor ever launched to exit.
    async fn join(&self) -> Result<(), FrameworkError>;

    /// [`halt`](SimActor::halt) followed by [`join`](SimActor::join).
    async fn shutdown(&self) -> Result<(), FrameworkError> {
        self.halt();
        self.join().await
    }
}
