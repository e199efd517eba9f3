//! Remote access to the `/todos` resource.
//!
//! Defines the [`TodoApi`] trait the list controller talks to.
//! Implementations:
//! - [`http::HttpTodoApi`] -- `reqwest` client for a real server
//! - [`memory::InMemoryTodoApi`] -- in-process backend for offline mode and tests
//!
//! Every operation is a single round trip: no retries, no caching. Callers
//! decide what a failure means; this layer only reports it.

pub mod http;
pub mod memory;

use reqwest::StatusCode;
use todoterm_proto::{Task, TaskFields, TaskId, UserId};

/// Errors that can occur while talking to the remote resource.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL is empty or not a valid URL.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {message}")]
    Request {
        /// Transport error description.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("http {status}: {body}")]
    Http {
        /// Response status.
        status: StatusCode,
        /// Response body, or `<empty>`.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("invalid response body: {message}")]
    Decode {
        /// Decoder error description.
        message: String,
    },
}

/// The four operations of the `/todos` resource.
///
/// # Invariant
///
/// [`TodoApi::update_task`] has full-replace semantics: the returned record
/// is the server's canonical version and may differ from the one sent.
pub trait TodoApi: Send + Sync {
    /// Lists the tasks of `user_id` in server order.
    fn list_tasks(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, ApiError>> + Send;

    /// Creates a task and returns it with its server-assigned id.
    fn create_task(
        &self,
        fields: &TaskFields,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// Replaces the record of `task.id` with `task`'s fields.
    fn update_task(
        &self,
        task: &Task,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// Deletes the task `id`.
    fn delete_task(
        &self,
        id: TaskId,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}
