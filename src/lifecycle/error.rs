use sim_framework::FrameworkError;

/// Errors surfaced by the plant coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("{actor} did not shut down cleanly: {source}")]
    Actor {
        actor: String,
        #[source]
        source: FrameworkError,
    },
    #[error("Event log unavailable: {0}")]
    Log(#[from] FrameworkError),
    #[error("Listener for {actor} failed: {reason}")]
    Listener { actor: String, reason: String },
    #[error("Event log task failed: {0}")]
    LogTask(String),
}
