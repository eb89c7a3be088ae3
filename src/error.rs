//! Error taxonomy for a search run.

use std::io;
use std::path::PathBuf;

use crate::search::TaskDescriptor;

/// Errors surfaced by the search core.
#[derive(Debug, thiserror::Error)]
pub enum SmashError {
    /// Rejected before any task was dispatched.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A worker faulted while running a task. The whole run is aborted.
    #[error("Worker failed on task [{task}]: {reason}")]
    WorkerFailure {
        task: Box<TaskDescriptor>,
        reason: String,
    },

    /// The stop flag was raised before every task completed.
    #[error("Search cancelled before the full space was checked")]
    Cancelled,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("Failed to read digests from {}: {source}", path.display())]
    ReadTargets {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write matches to {}: {source}", path.display())]
    WriteMatches {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SmashError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SmashError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SmashError>;
