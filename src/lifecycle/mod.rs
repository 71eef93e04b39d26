//! Plant orchestration and lifecycle management.
//!
//! - [`Coordinator`] - the live registry and the cross-actor policy
//! - [`routing`] - where a completed load goes
//! - [`event_log`] - the timestamped plant log, kept by its own mailbox actor
//! - [`setup_tracing`] - structured logging for the binary

pub mod coordinator;
pub mod error;
pub mod event_log;
pub mod routing;

pub use coordinator::*;
pub use error::*;
pub use event_log::{EventLogClient, LogEntry};
pub use sim_framework::tracing::setup_tracing;
