//! Task records as they travel over the wire.
//!
//! The JSON shape is `{id, title, completed, userId}`. Create and update
//! requests carry the same record without `id` ([`TaskFields`]); the id of
//! an update travels in the request path instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw numeric id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw numeric user id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric user id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identity of the task.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Owner of the task.
    pub user_id: UserId,
}

impl Task {
    /// The request body that replaces this task on the server.
    #[must_use]
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            completed: self.completed,
            user_id: self.user_id,
        }
    }

    /// Returns a copy with `completed` set to `completed`.
    #[must_use]
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }

    /// Returns a copy with a new title.
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// Body of `POST /todos` and `PATCH /todos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    /// Display title.
    pub title: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Owner of the task.
    pub user_id: UserId,
}

impl TaskFields {
    /// Attaches a server-assigned id, producing the persisted record.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            completed: self.completed,
            user_id: self.user_id,
        }
    }
}
