//! HTTP surface of the development server.
//!
//! Routes:
//! - `GET /todos?userId={id}` lists one user's tasks
//! - `POST /todos` creates a task from `{title, completed, userId}`
//! - `PATCH /todos/{id}` replaces a task's fields
//! - `DELETE /todos/{id}` removes a task; the body is empty
//!
//! Unknown ids answer `404`, a listing without `userId` answers `400`, and
//! any operation the [`TodoStore`] fault plan marks as failing answers `500`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use todoterm_proto::routes;
use todoterm_proto::{Task, TaskFields, TaskId, UserId};

use crate::store::{Operation, TodoStore};

/// Errors returned to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listing request had no `userId` query parameter.
    #[error("missing userId query parameter")]
    MissingUserId,
    /// No task with the given id exists.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The fault plan asked for this operation to fail.
    #[error("injected failure for {0:?}")]
    Injected(Operation),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingUserId => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Injected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "userId")]
    user_id: Option<u64>,
}

/// Builds the `/todos` router over `store`.
pub fn router(store: Arc<TodoStore>) -> axum::Router {
    axum::Router::new()
        .route(routes::TODOS, get(list_todos).post(create_todo))
        .route(routes::TODO_ITEM, axum::routing::patch(update_todo).delete(delete_todo))
        .with_state(store)
}

/// Starts the server with an empty store on `addr`.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_store(addr, Arc::new(TodoStore::new())).await
}

/// Starts the server over a caller-owned store.
///
/// Tests keep a clone of the `Arc` to seed tasks and plan failures while
/// the server is running. Bind to `127.0.0.1:0` for an OS-assigned port.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_store(
    addr: &str,
    store: Arc<TodoStore>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "todo server error");
        }
    });

    Ok((bound_addr, handle))
}

async fn list_todos(
    State(store): State<Arc<TodoStore>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Task>>, ServerError> {
    let user_id = UserId::new(query.user_id.ok_or(ServerError::MissingUserId)?);
    if store.should_fail(Operation::List, None).await {
        return Err(ServerError::Injected(Operation::List));
    }
    let tasks = store.list(user_id).await;
    tracing::debug!(user_id = %user_id, count = tasks.len(), "listed tasks");
    Ok(Json(tasks))
}

async fn create_todo(
    State(store): State<Arc<TodoStore>>,
    Json(fields): Json<TaskFields>,
) -> Result<(StatusCode, Json<Task>), ServerError> {
    if store.should_fail(Operation::Create, None).await {
        return Err(ServerError::Injected(Operation::Create));
    }
    let task = store.create(fields).await;
    tracing::info!(task_id = %task.id, user_id = %task.user_id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_todo(
    State(store): State<Arc<TodoStore>>,
    Path(id): Path<i64>,
    Json(fields): Json<TaskFields>,
) -> Result<Json<Task>, ServerError> {
    let id = TaskId::new(id);
    if store.should_fail(Operation::Update, Some(id)).await {
        return Err(ServerError::Injected(Operation::Update));
    }
    let task = store
        .update(id, fields)
        .await
        .ok_or(ServerError::NotFound(id))?;
    tracing::info!(task_id = %id, completed = task.completed, "updated task");
    Ok(Json(task))
}

async fn delete_todo(
    State(store): State<Arc<TodoStore>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    let id = TaskId::new(id);
    if store.should_fail(Operation::Delete, Some(id)).await {
        return Err(ServerError::Injected(Operation::Delete));
    }
    if !store.delete(id).await {
        return Err(ServerError::NotFound(id));
    }
    tracing::info!(task_id = %id, "deleted task");
    Ok(StatusCode::NO_CONTENT)
}
