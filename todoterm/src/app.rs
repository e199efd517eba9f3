//! Terminal application state and key handling.
//!
//! [`App`] holds only what belongs to the terminal: focus, the selected row,
//! and the inline editor. Everything about the list itself lives in
//! [`ListState`]; key presses that change it come back as [`Action`]s for the
//! main loop to run against the controller.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use todoterm_proto::TaskId;

use crate::filter::Filter;
use crate::item::ItemEditor;
use crate::state::{ItemRow, ListState};

/// Which part of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// New-task input (default).
    Input,
    /// Task list.
    List,
}

/// A list transition requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the new-task input text.
    SetInput(String),
    /// Create a task from the input.
    Submit,
    /// Flip one task's completion.
    Toggle(TaskId),
    /// Complete all, or un-complete all if all are completed.
    ToggleAll,
    /// Delete one task.
    Delete(TaskId),
    /// Delete every completed task.
    ClearCompleted,
    /// Change the view filter.
    SetFilter(Filter),
    /// Hide the error banner.
    DismissError,
    /// Commit the inline editor's draft.
    CommitEdit {
        /// Task being edited.
        id: TaskId,
        /// Draft title, untrimmed.
        draft: String,
    },
}

/// Outcome of a spawned edit commit, fed back into the [`App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The commit was applied (or was a no-op): close the editor.
    EditFinished(TaskId),
    /// The commit failed: keep editing.
    EditRejected(TaskId),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Which part of the screen is focused.
    pub focus: Focus,
    /// Index of the selected row in [`ListState::rows`].
    pub selected: usize,
    /// Inline editor, if a row is being edited.
    pub editor: Option<ItemEditor>,
    /// Where tasks come from, shown in the status bar.
    pub source: String,
    /// Whether the app should quit.
    pub should_quit: bool,
    seen_focus_requests: u64,
}

impl App {
    /// Creates the app with focus on the new-task input.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            focus: Focus::Input,
            selected: 0,
            editor: None,
            source: source.into(),
            should_quit: false,
            seen_focus_requests: 0,
        }
    }

    /// Handles a key event against the current list state.
    pub fn handle_key_event(&mut self, key: KeyEvent, state: &ListState) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.editor.is_some() {
            return self.handle_editor_key(key);
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key, state),
            Focus::List => self.handle_list_key(key, state),
        }
    }

    /// Reconciles terminal state with a new list state.
    ///
    /// Follows focus requests made by transitions, keeps the selection in
    /// range and drops an idle editor whose task is gone.
    pub fn sync(&mut self, state: &ListState) {
        if state.focus_requests != self.seen_focus_requests {
            self.seen_focus_requests = state.focus_requests;
            if self.editor.is_none() {
                self.focus = Focus::Input;
            }
        }

        let len = state.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));

        let orphaned = self
            .editor
            .as_ref()
            .is_some_and(|e| !e.is_saving() && state.task(e.id()).is_none());
        if orphaned {
            self.editor = None;
        }
    }

    /// Applies the outcome of a spawned edit commit.
    pub fn apply_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::EditFinished(id) => {
                if self.editor.as_ref().is_some_and(|e| e.id() == id) {
                    self.editor = None;
                }
            }
            UiEvent::EditRejected(id) => {
                if let Some(editor) = self.editor.as_mut().filter(|e| e.id() == id) {
                    editor.reopen();
                }
            }
        }
    }

    /// The selected row, if the list has any.
    #[must_use]
    pub fn selected_row<'a>(&self, state: &'a ListState) -> Option<ItemRow<'a>> {
        state.rows().get(self.selected).copied()
    }

    fn handle_input_key(&mut self, key: KeyEvent, state: &ListState) -> Option<Action> {
        match key.code {
            KeyCode::Tab => {
                self.focus = Focus::List;
                None
            }
            _ if state.adding => None,
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Char(c) => {
                let mut text = state.input.clone();
                text.push(c);
                Some(Action::SetInput(text))
            }
            KeyCode::Backspace => {
                let mut text = state.input.clone();
                text.pop().map(|_| Action::SetInput(text))
            }
            _ => None,
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, state: &ListState) -> Option<Action> {
        match key.code {
            KeyCode::Tab => {
                self.focus = Focus::Input;
                None
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < state.rows().len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char(' ') => self.idle_selected(state).map(Action::Toggle),
            KeyCode::Char('d') | KeyCode::Delete => self.idle_selected(state).map(Action::Delete),
            KeyCode::Enter | KeyCode::Char('e') => {
                let id = self.idle_selected(state)?;
                self.editor = state.task(id).map(ItemEditor::begin);
                None
            }
            KeyCode::Char('a') if !state.tasks.is_empty() => Some(Action::ToggleAll),
            KeyCode::Char('c') if state.completed_count() > 0 => Some(Action::ClearCompleted),
            KeyCode::Char('f') => Some(Action::SetFilter(state.filter.next())),
            KeyCode::Char('1') => Some(Action::SetFilter(Filter::All)),
            KeyCode::Char('2') => Some(Action::SetFilter(Filter::Active)),
            KeyCode::Char('3') => Some(Action::SetFilter(Filter::Completed)),
            KeyCode::Char('x') if state.error.is_some() => Some(Action::DismissError),
            _ => None,
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Option<Action> {
        let editor = self.editor.as_mut()?;
        match key.code {
            KeyCode::Enter | KeyCode::Tab => {
                let draft = editor.start_commit()?;
                Some(Action::CommitEdit {
                    id: editor.id(),
                    draft,
                })
            }
            KeyCode::Esc => {
                if !editor.is_saving() {
                    self.editor = None;
                }
                None
            }
            KeyCode::Char(c) => {
                editor.insert_char(c);
                None
            }
            KeyCode::Backspace => {
                editor.backspace();
                None
            }
            _ => None,
        }
    }

    /// Id of the selected row, unless it is pending or loading.
    fn idle_selected(&self, state: &ListState) -> Option<TaskId> {
        self.selected_row(state)
            .filter(|row| !row.is_loading())
            .and_then(|row| row.id())
    }
}
