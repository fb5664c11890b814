use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the session core.
///
/// Every variant maps to a one-line status message in the shell; only `Io` on the
/// exit-time save is fatal.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A hypothesis failed its invariant checks.
    #[error("invalid hypothesis: {0}")]
    InvalidEntity(String),

    /// A persisted document could not be parsed.
    #[error("corrupt session: {0}")]
    CorruptSession(String),

    /// The session file does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("feedback text is empty")]
    EmptyFeedback,

    /// A request for this lineage is already in flight.
    #[error("hypothesis #{0} is busy with another request")]
    Busy(u32),

    #[error("{0}")]
    CollaboratorFailure(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn collaborator(err: anyhow::Error) -> Self {
        Self::CollaboratorFailure(format!("{:#}", err))
    }
}
