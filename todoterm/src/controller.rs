//! List controller: keeps the local task list in sync with the server.
//!
//! Each transition reads and writes the [`StateStore`] in short atomic steps
//! and awaits the [`TodoApi`] in between, so the UI stays live while requests
//! are in flight and the loading set shows which rows are busy.
//!
//! Failure policies differ by transition:
//! - single-task transitions leave the collection as it was and show an error
//! - [`TodoController::toggle_all`] sends its updates one at a time and is
//!   all-or-nothing: on the first failure the rest are skipped and none of
//!   the responses already received are applied
//! - [`TodoController::clear_completed`] sends its deletes concurrently and
//!   applies every delete that succeeded, even if others failed
//!
//! A control whose transition is still running is disabled: repeated
//! submits, per-task transitions on a task that is already loading, and a
//! second toggle-all or clear-completed while one runs are ignored.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use todoterm_proto::{Task, TaskId, UserId};

use crate::api::TodoApi;
use crate::banner::{DEFAULT_ERROR_TIMEOUT, ErrorBanner};
use crate::filter::Filter;
use crate::item::{CommitPlan, plan_commit};
use crate::state::{DraftTask, ListState, TodoError};
use crate::store::StateStore;

/// Result of committing an inline title edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Title was unchanged; no request was made.
    Unchanged,
    /// The server accepted the new title.
    Renamed(Task),
    /// The draft was blank and the task was deleted.
    Deleted,
}

/// Clears a "transition running" flag when the transition ends, including
/// when its task is aborted.
struct Running<'a>(&'a AtomicBool);

impl<'a> Running<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owner of the task list and orchestrator of all remote mutations.
#[derive(Debug)]
pub struct TodoController<A> {
    api: A,
    user_id: UserId,
    store: StateStore,
    banner: ErrorBanner,
    toggling_all: AtomicBool,
    clearing: AtomicBool,
}

impl<A: TodoApi> TodoController<A> {
    /// Creates a controller for `user_id` with the default error timeout.
    #[must_use]
    pub fn new(api: A, user_id: UserId) -> Self {
        Self::with_error_timeout(api, user_id, DEFAULT_ERROR_TIMEOUT)
    }

    /// Creates a controller whose error banner clears after `timeout`.
    #[must_use]
    pub fn with_error_timeout(api: A, user_id: UserId, timeout: Duration) -> Self {
        let store = StateStore::default();
        Self {
            api,
            user_id,
            banner: ErrorBanner::new(store.clone(), timeout),
            store,
            toggling_all: AtomicBool::new(false),
            clearing: AtomicBool::new(false),
        }
    }

    /// The observable state.
    #[must_use]
    pub const fn store(&self) -> &StateStore {
        &self.store
    }

    /// Clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ListState {
        self.store.snapshot()
    }

    /// The backend this controller talks to.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Owner of the list.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    // -----------------------------------------------------------------------
    // Local transitions
    // -----------------------------------------------------------------------

    /// Replaces the new-task input text. Ignored while a create is in flight.
    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.store.update_if(|s| {
            if s.adding || s.input == text {
                return false;
            }
            s.input = text;
            true
        });
    }

    /// Changes the view filter. Never touches the collection.
    pub fn set_filter(&self, filter: Filter) {
        self.store.update_if(|s| {
            let changed = s.filter != filter;
            s.filter = filter;
            changed
        });
    }

    /// Hides the error banner.
    pub fn dismiss_error(&self) {
        self.banner.dismiss();
    }

    // -----------------------------------------------------------------------
    // Remote transitions
    // -----------------------------------------------------------------------

    /// Fetches the list and replaces the collection.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::LoadFailure`] (also shown in the banner) if the
    /// listing fails. The collection is left as it was.
    pub async fn load(&self) -> Result<(), TodoError> {
        tracing::debug!(user_id = %self.user_id, "loading tasks");
        match self.api.list_tasks(self.user_id).await {
            Ok(tasks) => {
                let tasks = dedup_by_id(tasks);
                tracing::info!(count = tasks.len(), "tasks loaded");
                self.store.update(|s| s.tasks = tasks);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "loading tasks failed");
                Err(self.raise(TodoError::LoadFailure))
            }
        }
    }

    /// Creates a task from the new-task input.
    ///
    /// The draft is shown as a pending row while the request is in flight.
    /// On success the confirmed task is appended and the input cleared; on
    /// failure the pending row is dropped and the input kept. Returns
    /// `Ok(None)` if a create was already running.
    ///
    /// # Errors
    ///
    /// [`TodoError::EmptyTitle`] if the trimmed input is blank (no request is
    /// made), [`TodoError::AddFailure`] if the create fails.
    pub async fn submit(&self) -> Result<Option<Task>, TodoError> {
        let user_id = self.user_id;
        let mut blank = false;
        let mut started = None;
        self.store.update_if(|s| {
            if s.adding {
                return false;
            }
            let title = s.input.trim();
            if title.is_empty() {
                blank = true;
                return false;
            }
            let draft = DraftTask {
                title: title.to_string(),
                completed: false,
                user_id,
            };
            s.pending = Some(draft.clone());
            s.adding = true;
            started = Some(draft);
            true
        });

        if blank {
            return Err(self.raise(TodoError::EmptyTitle));
        }
        let Some(draft) = started else {
            tracing::debug!("create already in flight");
            return Ok(None);
        };

        tracing::debug!(title = %draft.title, "creating task");
        let result = self.api.create_task(&draft.fields()).await;
        match result {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "task created");
                let created = task.clone();
                self.store.update(|s| {
                    upsert(&mut s.tasks, created);
                    s.pending = None;
                    s.input.clear();
                    s.adding = false;
                    s.focus_requests += 1;
                });
                Ok(Some(task))
            }
            Err(e) => {
                tracing::warn!(error = %e, "creating task failed");
                let kind = self.raise(TodoError::AddFailure);
                self.store.update(|s| {
                    s.pending = None;
                    s.adding = false;
                    s.focus_requests += 1;
                });
                Err(kind)
            }
        }
    }

    /// Flips the completion of task `id`.
    ///
    /// Nothing changes locally until the server answers; its record then
    /// replaces the local one. Unknown or busy ids are ignored.
    ///
    /// # Errors
    ///
    /// [`TodoError::UpdateFailure`] if the update fails.
    pub async fn toggle(&self, id: TaskId) -> Result<(), TodoError> {
        let Some(task) = self.claim(id) else {
            return Ok(());
        };
        tracing::debug!(task_id = %id, completed = !task.completed, "toggling task");

        let result = self.api.update_task(&task.with_completed(!task.completed)).await;
        self.finish_update(id, result).map(drop)
    }

    /// Marks every task completed, or every task active if all already are.
    ///
    /// Only tasks whose state differs from the target and that are not busy
    /// are sent, one request at a time in list order. If any request fails
    /// the remaining ones are skipped and none of the responses are applied.
    ///
    /// # Errors
    ///
    /// [`TodoError::UpdateFailure`] if any update fails.
    pub async fn toggle_all(&self) -> Result<(), TodoError> {
        let Some(_running) = Running::claim(&self.toggling_all) else {
            tracing::debug!("toggle-all already running");
            return Ok(());
        };

        let mut batch = None;
        self.store.update_if(|s| {
            if s.tasks.is_empty() {
                return false;
            }
            let target = !s.all_completed();
            let changed: Vec<Task> = s
                .tasks
                .iter()
                .filter(|t| t.completed != target && !s.loading.contains(&t.id))
                .cloned()
                .collect();
            if changed.is_empty() {
                return false;
            }
            s.loading.extend(changed.iter().map(|t| t.id));
            batch = Some((target, changed));
            true
        });
        let Some((target, changed)) = batch else {
            return Ok(());
        };
        let ids: BTreeSet<TaskId> = changed.iter().map(|t| t.id).collect();
        tracing::debug!(completed = target, count = changed.len(), "toggling all tasks");

        let mut updated = Vec::with_capacity(changed.len());
        let mut failed = false;
        for task in &changed {
            match self.api.update_task(&task.with_completed(target)).await {
                Ok(record) => updated.push(record),
                Err(e) => {
                    tracing::warn!(task_id = %task.id, error = %e, "toggle-all aborted");
                    failed = true;
                    break;
                }
            }
        }

        // Applied by id: the list may have changed while the batch ran.
        self.store.update(|s| {
            if !failed {
                for record in updated {
                    if let Some(slot) = s.tasks.iter_mut().find(|t| t.id == record.id) {
                        *slot = record;
                    }
                }
            }
            s.loading.retain(|id| !ids.contains(id));
        });

        if failed {
            Err(self.raise(TodoError::UpdateFailure))
        } else {
            Ok(())
        }
    }

    /// Commits an inline title edit of task `id`.
    ///
    /// A blank draft deletes the task; a draft equal to the current title
    /// (after trimming) closes the editor without a request.
    ///
    /// # Errors
    ///
    /// [`TodoError::UpdateFailure`] if the rename fails or the task is busy,
    /// [`TodoError::DeleteFailure`] if the delete fails. In both cases the
    /// editor should stay open. A busy task is not sent and raises no banner.
    pub async fn commit_title(&self, id: TaskId, draft: &str) -> Result<CommitOutcome, TodoError> {
        let (current, busy) = self.store.read(|s| (s.task(id).cloned(), s.is_loading(id)));
        let Some(current) = current else {
            tracing::debug!(task_id = %id, "edited task no longer exists");
            return Ok(CommitOutcome::Deleted);
        };
        if busy {
            tracing::debug!(task_id = %id, "edited task is busy");
            return Err(TodoError::UpdateFailure);
        }

        match plan_commit(&current.title, draft) {
            CommitPlan::Unchanged => Ok(CommitOutcome::Unchanged),
            CommitPlan::Delete => self.delete(id).await.map(|()| CommitOutcome::Deleted),
            CommitPlan::Rename(title) => {
                let Some(task) = self.claim(id) else {
                    return Err(TodoError::UpdateFailure);
                };
                tracing::debug!(task_id = %id, %title, "renaming task");
                let result = self.api.update_task(&task.with_title(title)).await;
                self.finish_update(id, result).map(CommitOutcome::Renamed)
            }
        }
    }

    /// Deletes task `id`. Unknown or busy ids are ignored.
    ///
    /// # Errors
    ///
    /// [`TodoError::DeleteFailure`] if the delete fails; the task stays.
    pub async fn delete(&self, id: TaskId) -> Result<(), TodoError> {
        if self.claim(id).is_none() {
            return Ok(());
        }
        tracing::debug!(task_id = %id, "deleting task");

        let result = self.api.delete_task(id).await;
        let removed = result.is_ok();
        self.store.update(|s| {
            if removed {
                s.tasks.retain(|t| t.id != id);
            }
            s.loading.remove(&id);
            s.focus_requests += 1;
        });

        match result {
            Ok(()) => {
                tracing::info!(task_id = %id, "task deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(task_id = %id, error = %e, "deleting task failed");
                Err(self.raise(TodoError::DeleteFailure))
            }
        }
    }

    /// Deletes every completed task, all requests in flight at once.
    ///
    /// Tasks whose delete succeeded are removed even if others failed.
    /// Completed tasks that are already busy are left out of the batch.
    ///
    /// # Errors
    ///
    /// [`TodoError::DeleteFailure`] if at least one delete fails.
    pub async fn clear_completed(&self) -> Result<(), TodoError> {
        let Some(_running) = Running::claim(&self.clearing) else {
            tracing::debug!("clear-completed already running");
            return Ok(());
        };

        let mut ids = Vec::new();
        self.store.update_if(|s| {
            ids = s
                .tasks
                .iter()
                .filter(|t| t.completed && !s.loading.contains(&t.id))
                .map(|t| t.id)
                .collect();
            s.loading.extend(ids.iter().copied());
            !ids.is_empty()
        });
        if ids.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = ids.len(), "clearing completed tasks");

        let results = join_all(ids.iter().map(|&id| async move {
            let result = self.api.delete_task(id).await;
            if let Err(e) = &result {
                tracing::warn!(task_id = %id, error = %e, "deleting completed task failed");
            }
            (id, result.is_ok())
        }))
        .await;

        let deleted: BTreeSet<TaskId> = results
            .iter()
            .filter(|(_, ok)| *ok)
            .map(|(id, _)| *id)
            .collect();
        let any_failed = deleted.len() < results.len();

        self.store.update(|s| {
            s.tasks.retain(|t| !deleted.contains(&t.id));
            s.loading.retain(|id| !ids.contains(id));
            s.focus_requests += 1;
        });
        tracing::info!(
            deleted = deleted.len(),
            failed = results.len() - deleted.len(),
            "completed tasks cleared"
        );

        if any_failed {
            Err(self.raise(TodoError::DeleteFailure))
        } else {
            Ok(())
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Marks `id` loading and returns its current record, unless the task
    /// is unknown or already loading.
    fn claim(&self, id: TaskId) -> Option<Task> {
        let mut claimed = None;
        self.store.update_if(|s| {
            if s.loading.contains(&id) {
                return false;
            }
            let Some(task) = s.task(id).cloned() else {
                return false;
            };
            s.loading.insert(id);
            claimed = Some(task);
            true
        });
        claimed
    }

    /// Applies the outcome of a single-task update and ends its loading state.
    fn finish_update(
        &self,
        id: TaskId,
        result: Result<Task, crate::api::ApiError>,
    ) -> Result<Task, TodoError> {
        match result {
            Ok(updated) => {
                tracing::info!(task_id = %id, "task updated");
                let applied = updated.clone();
                self.store.update(|s| {
                    if let Some(slot) = s.tasks.iter_mut().find(|t| t.id == id) {
                        *slot = applied;
                    }
                    s.loading.remove(&id);
                });
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!(task_id = %id, error = %e, "updating task failed");
                let kind = self.raise(TodoError::UpdateFailure);
                self.store.update(|s| {
                    s.loading.remove(&id);
                });
                Err(kind)
            }
        }
    }

    fn raise(&self, kind: TodoError) -> TodoError {
        self.banner.raise(kind);
        kind
    }
}

/// Replaces the task with the same id, or appends.
fn upsert(tasks: &mut Vec<Task>, task: Task) {
    if let Some(slot) = tasks.iter_mut().find(|t| t.id == task.id) {
        *slot = task;
    } else {
        tasks.push(task);
    }
}

/// Keeps the first occurrence of each id.
fn dedup_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = BTreeSet::new();
    tasks.into_iter().filter(|t| seen.insert(t.id)).collect()
}
