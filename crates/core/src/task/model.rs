//! Task model definitions

use serde::{Deserialize, Serialize};

/// A task that may need to be performed
///
/// An `id` of zero means "not yet assigned"; repositories mint a positive
/// id on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Create a new, not yet stored task with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            done: false,
        }
    }

    /// Set an explicit id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Set the done flag
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Whether a repository has assigned an id yet
    pub fn has_id(&self) -> bool {
        self.id != 0
    }
}
