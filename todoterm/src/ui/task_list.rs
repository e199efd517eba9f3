//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{self, Block, Borders, List, ListItem},
};

use super::theme;
use crate::app::{App, Focus};
use crate::item::{EDITOR_PLACEHOLDER, ItemEditor};
use crate::state::{ItemRow, ListState};

/// Render one line per visible task, then the pending task.
///
/// The view scrolls to keep the selected row on screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App, state: &ListState) {
    let is_focused = app.focus == Focus::List || app.editor.is_some();

    let items: Vec<ListItem> = state
        .rows()
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let editor = app
                .editor
                .as_ref()
                .filter(|e| row.id() == Some(e.id()));
            let line = row_line(row, editor);

            let style = if idx == app.selected && is_focused {
                theme::selected()
            } else {
                theme::normal()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let mut view = widgets::ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut view);
}

fn row_line<'a>(row: ItemRow<'a>, editor: Option<&'a ItemEditor>) -> Line<'a> {
    let (checkbox, checkbox_style) = if row.completed() {
        ("[\u{2713}]", theme::normal().fg(theme::SUCCESS))
    } else {
        ("[ ]", theme::normal())
    };

    let mut spans = vec![Span::styled(checkbox, checkbox_style), Span::raw(" ")];

    match editor {
        Some(editor) if editor.draft().is_empty() => {
            spans.push(Span::styled("\u{2588}", theme::input_cursor()));
            spans.push(Span::styled(EDITOR_PLACEHOLDER, theme::dimmed()));
        }
        Some(editor) => {
            spans.push(Span::styled(editor.draft(), theme::bold()));
            if !editor.is_saving() {
                spans.push(Span::styled("\u{2588}", theme::input_cursor()));
            }
        }
        None => {
            let style = if row.completed() {
                theme::completed()
            } else {
                theme::normal()
            };
            spans.push(Span::styled(row.title(), style));
        }
    }

    if row.is_loading() || editor.is_some_and(ItemEditor::is_saving) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled("\u{22ef}", theme::loading()));
    }

    Line::from(spans)
}
