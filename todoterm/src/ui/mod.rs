//! Terminal UI rendering.

pub mod footer;
pub mod header;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;
use crate::state::ListState;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App, state: &ListState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Tasks
            Constraint::Length(1), // Footer
            Constraint::Length(1), // Error banner
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app, state);
    task_list::render(frame, chunks[1], app, state);
    footer::render(frame, chunks[2], state);
    status_bar::render_banner(frame, chunks[3], state);
    status_bar::render(frame, chunks[4], app);
}
