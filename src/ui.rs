mod boxoffice_list;
mod date_picker;
mod footer;
mod header;
mod loading;
mod missing_key;
mod movie_detail;

use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use boxoffice_list::render_boxoffice_list;
use date_picker::render_date_picker;
use footer::render_footer;
use header::render_header;
use loading::render_loading;
use missing_key::render_missing_api_key;
use movie_detail::render_movie_detail;

/// Main UI rendering function that orchestrates all UI components
pub fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.current_screen() {
        CurrentScreen::MovieDetail => {
            render_movie_detail(frame, app, chunks[1]);
        }
        _ => {
            if !app.has_api_key() {
                render_missing_api_key(frame, chunks[1]);
            } else if app.boxoffice.is_loading() && app.boxoffice.rows().is_empty() {
                render_loading(frame, app, chunks[1]);
            } else {
                render_boxoffice_list(frame, app, chunks[1]);
            }
        }
    }

    if let Some(flow) = &app.date_selection {
        let area = frame.area();
        render_date_picker(frame, flow, area);
    }

    render_footer(frame, app, chunks[2]);
}
