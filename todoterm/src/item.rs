//! Inline title editor of a single task row.
//!
//! Editing is local to the row: the draft lives here until it is committed
//! (Enter or leaving the editor) or cancelled (Escape). What a commit does is
//! decided by [`plan_commit`]; the list controller carries it out.

use todoterm_proto::{Task, TaskId};

/// Placeholder shown in an empty editor.
pub const EDITOR_PLACEHOLDER: &str = "Empty todo will be deleted";

/// What committing a draft title means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitPlan {
    /// Trimmed draft equals the current title: close the editor, no request.
    Unchanged,
    /// Trimmed draft is empty: delete the task.
    Delete,
    /// Save the trimmed title.
    Rename(String),
}

/// Decides what committing `draft` over `original` does.
#[must_use]
pub fn plan_commit(original: &str, draft: &str) -> CommitPlan {
    let trimmed = draft.trim();
    if trimmed.is_empty() {
        CommitPlan::Delete
    } else if trimmed == original {
        CommitPlan::Unchanged
    } else {
        CommitPlan::Rename(trimmed.to_string())
    }
}

/// Editing sub-state of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEditor {
    id: TaskId,
    original: String,
    draft: String,
    saving: bool,
}

impl ItemEditor {
    /// Starts editing `task`, seeding the draft with its title.
    #[must_use]
    pub fn begin(task: &Task) -> Self {
        Self {
            id: task.id,
            original: task.title.clone(),
            draft: task.title.clone(),
            saving: false,
        }
    }

    /// Task being edited.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Current draft text.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Title the task had when editing started.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// True while a commit is waiting for the server.
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    /// Appends a character to the draft. Ignored while saving.
    pub fn insert_char(&mut self, c: char) {
        if !self.saving {
            self.draft.push(c);
        }
    }

    /// Removes the last character of the draft. Ignored while saving.
    pub fn backspace(&mut self) {
        if !self.saving {
            self.draft.pop();
        }
    }

    /// Marks a commit as started and returns the draft to submit.
    ///
    /// Returns `None` if a commit is already in flight.
    pub fn start_commit(&mut self) -> Option<String> {
        if self.saving {
            return None;
        }
        self.saving = true;
        Some(self.draft.clone())
    }

    /// The commit failed: keep editing with the same draft.
    pub const fn reopen(&mut self) {
        self.saving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoterm_proto::UserId;

    fn task() -> Task {
        Task {
            id: TaskId::new(3),
            title: "Write docs".to_string(),
            completed: false,
            user_id: UserId::new(1),
        }
    }

    #[test]
    fn plan_unchanged_after_trim() {
        assert_eq!(plan_commit("Write docs", "  Write docs "), CommitPlan::Unchanged);
    }

    #[test]
    fn plan_delete_when_blank() {
        assert_eq!(plan_commit("Write docs", "   "), CommitPlan::Delete);
        assert_eq!(plan_commit("Write docs", ""), CommitPlan::Delete);
    }

    #[test]
    fn plan_rename_trims() {
        assert_eq!(
            plan_commit("Write docs", " Write more docs  "),
            CommitPlan::Rename("Write more docs".to_string())
        );
    }

    #[test]
    fn begin_seeds_draft_from_title() {
        let editor = ItemEditor::begin(&task());
        assert_eq!(editor.id(), TaskId::new(3));
        assert_eq!(editor.draft(), "Write docs");
        assert_eq!(editor.original(), "Write docs");
        assert!(!editor.is_saving());
    }

    #[test]
    fn editing_is_frozen_while_saving() {
        let mut editor = ItemEditor::begin(&task());
        editor.backspace();
        editor.insert_char('!');
        assert_eq!(editor.start_commit().as_deref(), Some("Write doc!"));
        assert_eq!(editor.start_commit(), None);

        editor.insert_char('x');
        assert_eq!(editor.draft(), "Write doc!");

        editor.reopen();
        editor.insert_char('x');
        assert_eq!(editor.draft(), "Write doc!x");
    }
}
