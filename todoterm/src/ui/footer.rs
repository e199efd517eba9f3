//! Footer rendering: counter, filter tabs and clear-completed.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::filter::Filter;
use crate::state::ListState;

/// Render the footer. Nothing is drawn for an empty collection.
pub fn render(frame: &mut Frame, area: Rect, state: &ListState) {
    if state.tasks.is_empty() {
        return;
    }

    let mut spans = vec![
        Span::styled(state.items_left_label(), theme::normal()),
        Span::raw("   "),
    ];
    for filter in Filter::ALL {
        let style = if filter == state.filter {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled(filter.label(), style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        "Clear completed",
        if state.completed_count() > 0 {
            theme::normal()
        } else {
            theme::dimmed()
        },
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
