//! Shared wire definitions for the `/todos` REST resource.

pub mod routes;
pub mod task;

pub use task::{Task, TaskFields, TaskId, UserId};
