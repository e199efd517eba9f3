//! Status bar and error banner rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Focus};
use crate::state::ListState;

/// Render the error banner line, if an error is showing.
pub fn render_banner(frame: &mut Frame, area: Rect, state: &ListState) {
    let Some(kind) = state.error_kind() else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(format!(" {kind} "), theme::error_banner()),
        Span::styled("  x: dismiss", theme::dimmed()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match (app.editor.is_some(), app.focus) {
        (true, _) => "Enter/Tab: save | Esc: cancel | Ctrl+C: quit",
        (false, Focus::Input) => "Enter: add | Tab: list | Ctrl+C: quit",
        (false, Focus::List) => {
            "\u{2191}\u{2193}/jk: move | Space: toggle | e: edit | d: delete | a: all | c: clear | f/1-3: filter | Tab: input | q: quit"
        }
    };

    let status_line = Line::from(vec![
        Span::styled(concat!("todoterm v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
        Span::raw(app.source.as_str()),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
