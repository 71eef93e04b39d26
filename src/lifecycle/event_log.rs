//! # Event Log Actor
//!
//! The plant log is append-only and written from many listener tasks at once.
//! Rather than sharing a locked `Vec`, one [`EventLog`] actor owns the entries
//! and processes requests sequentially from its mailbox; everyone else talks to
//! it through a cloneable [`EventLogClient`].
//!
//! The actor exits once every client has been dropped and returns the final
//! entries from [`EventLog::run`].

use chrono::{DateTime, Local};
use serde::Serialize;
use sim_framework::FrameworkError;
use std::fmt::{self, Display};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// One timestamped line of the plant log.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            message: message.into(),
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

#[derive(Debug)]
enum LogRequest {
    Append(LogEntry),
    Entries {
        respond_to: oneshot::Sender<Vec<LogEntry>>,
    },
}

/// Single writer of the plant log.
pub struct EventLog {
    receiver: mpsc::Receiver<LogRequest>,
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new(buffer_size: usize) -> (Self, EventLogClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            entries: Vec::new(),
        };
        (actor, EventLogClient { sender })
    }

    /// Processes requests until every client is gone.
    pub async fn run(mut self) -> Vec<LogEntry> {
        info!("Event log started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LogRequest::Append(entry) => {
                    debug!(message = %entry.message, "Log");
                    self.entries.push(entry);
                }
                LogRequest::Entries { respond_to } => {
                    let _ = respond_to.send(self.entries.clone());
                }
            }
        }
        info!(size = self.entries.len(), "Event log closed");
        self.entries
    }
}

/// Handle for appending to and reading the plant log.
#[derive(Clone, Debug)]
pub struct EventLogClient {
    sender: mpsc::Sender<LogRequest>,
}

impl EventLogClient {
    /// Appends `message` stamped with the current local time.
    pub async fn append(&self, message: impl Into<String>) -> Result<(), FrameworkError> {
        self.sender
            .send(LogRequest::Append(LogEntry::now(message)))
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }

    /// Snapshot of everything logged so far.
    pub async fn entries(&self) -> Result<Vec<LogEntry>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LogRequest::Entries { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_keep_append_order() {
        let (log, client) = EventLog::new(8);
        let handle = tokio::spawn(log.run());

        client.append("first").await.unwrap();
        client.append("second").await.unwrap();
        let entries = client.entries().await.unwrap();
        let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);

        drop(client);
        let final_entries = handle.await.unwrap();
        assert_eq!(final_entries.len(), 2);
    }

    #[tokio::test]
    async fn test_closed_log_rejects_appends() {
        let (log, client) = EventLog::new(1);
        drop(log);
        assert!(matches!(
            client.append("late").await,
            Err(FrameworkError::ActorClosed)
        ));
    }

    #[test]
    fn test_entry_renders_with_clock_time() {
        let entry = LogEntry::now("Furnace #1 added");
        let rendered = entry.to_string();
        assert!(rendered.starts_with('['));
        assert_eq!(&rendered[9..], "] Furnace #1 added");
    }
}
