//! Header rendering: panel title, toggle-all marker and new-task input.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Focus};
use crate::state::ListState;

/// Placeholder of the empty new-task input.
pub const INPUT_PLACEHOLDER: &str = "What needs to be done?";

/// Render the header box.
pub fn render(frame: &mut Frame, area: Rect, app: &App, state: &ListState) {
    let is_focused = app.focus == Focus::Input && app.editor.is_none();

    let mut spans = Vec::new();
    if !state.tasks.is_empty() {
        let marker_style = if state.all_completed() {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled("\u{276f} ", marker_style));
    }

    if state.input.is_empty() && !state.adding {
        if is_focused {
            spans.push(Span::styled("\u{2588}", theme::input_cursor()));
        }
        spans.push(Span::styled(INPUT_PLACEHOLDER, theme::dimmed()));
    } else {
        let style = if state.adding {
            theme::dimmed()
        } else {
            theme::normal()
        };
        spans.push(Span::styled(state.input.as_str(), style));
        if is_focused && !state.adding {
            spans.push(Span::styled("\u{2588}", theme::input_cursor()));
        }
    }

    let block = Block::default()
        .title(Span::styled("todos", theme::panel_title(theme::TITLE)))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
