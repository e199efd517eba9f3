//! The list state and the values derived from it for rendering.

use std::collections::BTreeSet;

use todoterm_proto::{Task, TaskFields, TaskId, UserId};
use tokio::time::Instant;

use crate::filter::Filter;

/// User-facing failure of a list transition.
///
/// Every remote failure of a given operation collapses to one variant; the
/// cause (network down, 404, 500) is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    /// The initial listing failed.
    #[error("Unable to load todos")]
    LoadFailure,
    /// The new-task input was blank. No request was made.
    #[error("Title should not be empty")]
    EmptyTitle,
    /// Creating a task failed.
    #[error("Unable to add a todo")]
    AddFailure,
    /// Deleting a task failed.
    #[error("Unable to delete a todo")]
    DeleteFailure,
    /// Updating a task failed.
    #[error("Unable to update a todo")]
    UpdateFailure,
}

/// The error currently shown in the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorNotice {
    /// What went wrong.
    pub kind: TodoError,
    /// When the banner clears itself.
    pub expires_at: Instant,
    /// Identifies this notice among successive ones; a timer only clears
    /// the notice it was armed for.
    pub seq: u64,
}

/// A task that has been submitted but not yet confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftTask {
    /// Trimmed title.
    pub title: String,
    /// Always false for a new task.
    pub completed: bool,
    /// Owner.
    pub user_id: UserId,
}

impl DraftTask {
    /// Request body for creating this task.
    #[must_use]
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            completed: self.completed,
            user_id: self.user_id,
        }
    }
}

/// One rendered row of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRow<'a> {
    /// A persisted task.
    Confirmed {
        /// The task.
        task: &'a Task,
        /// Whether a request for this task is in flight.
        loading: bool,
    },
    /// The optimistic task awaiting its create response. Always loading.
    Pending(&'a DraftTask),
}

impl<'a> ItemRow<'a> {
    /// Id of a confirmed row; `None` for the pending row.
    #[must_use]
    pub const fn id(&self) -> Option<TaskId> {
        match self {
            Self::Confirmed { task, .. } => Some(task.id),
            Self::Pending(_) => None,
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &'a str {
        match *self {
            Self::Confirmed { task, .. } => &task.title,
            Self::Pending(draft) => &draft.title,
        }
    }

    /// Completion flag.
    #[must_use]
    pub const fn completed(&self) -> bool {
        match self {
            Self::Confirmed { task, .. } => task.completed,
            Self::Pending(draft) => draft.completed,
        }
    }

    /// Whether the row's controls are disabled behind the loading overlay.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        match self {
            Self::Confirmed { loading, .. } => *loading,
            Self::Pending(_) => true,
        }
    }
}

/// Everything the list controller owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// Authoritative collection, in server order.
    pub tasks: Vec<Task>,
    /// Optimistic task being created, rendered after the collection.
    pub pending: Option<DraftTask>,
    /// Active view filter.
    pub filter: Filter,
    /// New-task input text.
    pub input: String,
    /// True while a create is in flight; disables the input.
    pub adding: bool,
    /// Ids with a request in flight.
    pub loading: BTreeSet<TaskId>,
    /// Current error banner.
    pub error: Option<ErrorNotice>,
    /// Bumped each time a transition asks for focus on the new-task input.
    pub focus_requests: u64,
}

impl ListState {
    /// Tasks passing the active filter, in collection order.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Visible rows followed by the pending row, if any.
    #[must_use]
    pub fn rows(&self) -> Vec<ItemRow<'_>> {
        let mut rows: Vec<ItemRow<'_>> = self
            .visible_tasks()
            .into_iter()
            .map(|task| ItemRow::Confirmed {
                task,
                loading: self.loading.contains(&task.id),
            })
            .collect();
        if let Some(draft) = &self.pending {
            rows.push(ItemRow::Pending(draft));
        }
        rows
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Whether `id` has a request in flight.
    #[must_use]
    pub fn is_loading(&self, id: TaskId) -> bool {
        self.loading.contains(&id)
    }

    /// Number of tasks not yet completed.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Number of completed tasks.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// True if every task is completed (vacuously true when empty).
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.tasks.iter().all(|t| t.completed)
    }

    /// Footer counter text.
    #[must_use]
    pub fn items_left_label(&self) -> String {
        format!("{} items left", self.active_count())
    }

    /// Kind of the error currently shown, if any.
    #[must_use]
    pub fn error_kind(&self) -> Option<TodoError> {
        self.error.map(|notice| notice.kind)
    }
}
