//! In-process [`TodoApi`] backend.
//!
//! Backs the `--offline` demo mode and the controller tests. Besides
//! storing tasks it can simulate latency, fail chosen operations, record
//! every call, and report the highest number of requests that were in
//! flight at the same time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::StatusCode;
use todoterm_proto::{Task, TaskFields, TaskId, UserId};

use super::{ApiError, TodoApi};

/// Operation kinds, used to plan failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOp {
    /// `list_tasks`
    List,
    /// `create_task`
    Create,
    /// `update_task`
    Update,
    /// `delete_task`
    Delete,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `list_tasks(user)`
    List(UserId),
    /// `create_task(fields)`
    Create(TaskFields),
    /// `update_task(task)`
    Update(Task),
    /// `delete_task(id)`
    Delete(TaskId),
}

impl ApiCall {
    /// The operation kind of this call.
    #[must_use]
    pub const fn op(&self) -> ApiOp {
        match self {
            Self::List(_) => ApiOp::List,
            Self::Create(_) => ApiOp::Create,
            Self::Update(_) => ApiOp::Update,
            Self::Delete(_) => ApiOp::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct Backend {
    tasks: Vec<Task>,
    next_id: i64,
    /// `(op, None)` fails every call of `op`.
    faults: Vec<(ApiOp, Option<TaskId>)>,
    calls: Vec<ApiCall>,
}

impl Backend {
    fn should_fail(&self, op: ApiOp, id: Option<TaskId>) -> bool {
        self.faults
            .iter()
            .any(|(f_op, f_id)| *f_op == op && (f_id.is_none() || *f_id == id))
    }
}

/// In-memory todo backend with fault injection.
#[derive(Debug, Default)]
pub struct InMemoryTodoApi {
    backend: Mutex<Backend>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Decrements the in-flight counter when a call finishes.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl InMemoryTodoApi {
    /// Creates an empty backend with no latency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding `tasks`. New ids continue after the highest one.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            backend: Mutex::new(Backend {
                tasks,
                next_id,
                ..Backend::default()
            }),
            ..Self::default()
        }
    }

    /// Delays every call by `latency` before it takes effect.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes every call of `op` fail.
    pub fn fail(&self, op: ApiOp) {
        self.backend.lock().faults.push((op, None));
    }

    /// Makes `op` fail for task `id` only.
    pub fn fail_task(&self, op: ApiOp, id: TaskId) {
        self.backend.lock().faults.push((op, Some(id)));
    }

    /// Removes all planned failures.
    pub fn heal(&self) {
        self.backend.lock().faults.clear();
    }

    /// Every call received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.backend.lock().calls.clone()
    }

    /// Number of calls of kind `op` received so far.
    #[must_use]
    pub fn call_count(&self, op: ApiOp) -> usize {
        self.backend
            .lock()
            .calls
            .iter()
            .filter(|c| c.op() == op)
            .count()
    }

    /// Current server-side tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.backend.lock().tasks.clone()
    }

    /// Highest number of calls that were in flight simultaneously.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn begin(&self, call: ApiCall) -> InFlight<'_> {
        self.backend.lock().calls.push(call);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(&self.in_flight)
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn finish_list(&self, user_id: UserId) -> Result<Vec<Task>, ApiError> {
        let backend = self.backend.lock();
        if backend.should_fail(ApiOp::List, None) {
            return Err(injected());
        }
        Ok(backend
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn finish_create(&self, fields: &TaskFields) -> Result<Task, ApiError> {
        let mut backend = self.backend.lock();
        if backend.should_fail(ApiOp::Create, None) {
            return Err(injected());
        }
        let id = TaskId::new(backend.next_id.max(1));
        backend.next_id = id.get() + 1;
        let task = fields.clone().into_task(id);
        backend.tasks.push(task.clone());
        Ok(task)
    }

    fn finish_update(&self, task: &Task) -> Result<Task, ApiError> {
        let mut backend = self.backend.lock();
        if backend.should_fail(ApiOp::Update, Some(task.id)) {
            return Err(injected());
        }
        let slot = backend
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(not_found)?;
        *slot = task.clone();
        Ok(slot.clone())
    }

    fn finish_delete(&self, id: TaskId) -> Result<(), ApiError> {
        let mut backend = self.backend.lock();
        if backend.should_fail(ApiOp::Delete, Some(id)) {
            return Err(injected());
        }
        let before = backend.tasks.len();
        backend.tasks.retain(|t| t.id != id);
        if backend.tasks.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

impl TodoApi for InMemoryTodoApi {
    async fn list_tasks(&self, user_id: UserId) -> Result<Vec<Task>, ApiError> {
        let _flight = self.begin(ApiCall::List(user_id));
        self.pause().await;
        self.finish_list(user_id)
    }

    async fn create_task(&self, fields: &TaskFields) -> Result<Task, ApiError> {
        let _flight = self.begin(ApiCall::Create(fields.clone()));
        self.pause().await;
        self.finish_create(fields)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, ApiError> {
        let _flight = self.begin(ApiCall::Update(task.clone()));
        self.pause().await;
        self.finish_update(task)
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let _flight = self.begin(ApiCall::Delete(id));
        self.pause().await;
        self.finish_delete(id)
    }
}

fn injected() -> ApiError {
    ApiError::Http {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "injected failure".to_string(),
    }
}

fn not_found() -> ApiError {
    ApiError::Http {
        status: StatusCode::NOT_FOUND,
        body: "<empty>".to_string(),
    }
}
