//! # Framework Errors
//!
//! This module defines the common error types used throughout the simulation framework.
//! By centralizing error definitions, we ensure consistent error handling across
//! all actors and the clients that talk to them.

/// Errors that can occur within the simulation framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Task {label} failed: {reason}")]
    TaskFailed { label: String, reason: String },
}

/// Marker returned by cancellable waits when the wait was interrupted.
///
/// Cancellation is an ordinary way for a run to end, so this is
/// not a [`FrameworkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cancelled")]
pub struct Cancelled;
