use crate::app::App;
use crate::app::render::PresentationMode;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, WhichUse};

/// Renders the title block: the loaded date, view mode and a throbber
/// while a fetch is in flight
pub fn render_header(frame: &mut Frame, app: &mut App, area: Rect) {
    let title_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());
    let inner = title_block.inner(area);
    frame.render_widget(title_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(24)])
        .split(inner);

    let heading = match app.boxoffice.title() {
        Some(date) => format!("Box Office {}", date),
        None => "Box Office".to_string(),
    };
    let mode = match app.boxoffice.mode() {
        PresentationMode::Compact => "list",
        PresentationMode::Card => "cards",
    };
    let title = Paragraph::new(Line::from(vec![
        Span::styled(heading, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  [{}]", mode), Style::default().fg(Color::Gray)),
    ]));
    frame.render_widget(title, chunks[0]);

    if app.boxoffice.is_loading() {
        let throbber = Throbber::default()
            .label("Loading...")
            .style(Style::default().fg(Color::Cyan))
            .throbber_set(BRAILLE_SIX)
            .use_type(WhichUse::Spin);
        frame.render_stateful_widget(throbber, chunks[1], &mut app.throbber_state);
    }
}
