//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("task not found")]
    TaskNotFound,

    #[error("task already exists")]
    TaskAlreadyExists,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Storage(String),
}

impl Error {
    /// Whether this error is one callers branch on, as opposed to an
    /// opaque storage failure.
    pub fn is_distinguished(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound | Self::TaskAlreadyExists | Self::InvalidInput(_)
        )
    }

    /// Wrap an opaque failure with the operation that produced it.
    ///
    /// Distinguished errors are returned unchanged.
    pub fn context(self, action: &str) -> Self {
        if self.is_distinguished() {
            self
        } else {
            Self::Storage(format!("could not {}: {}", action, self))
        }
    }
}
