use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, WhichUse};

/// Renders the loading screen shown before the first list arrives
pub fn render_loading(frame: &mut Frame, app: &mut App, area: Rect) {
    let loading_block = Block::default()
        .title("Box Office")
        .borders(Borders::ALL)
        .style(Style::default());
    let inner = loading_block.inner(area);
    frame.render_widget(loading_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let throbber = Throbber::default()
        .label(format!("Fetching box office for {}", app.boxoffice.state().date.format("%Y-%m-%d")))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);
    frame.render_stateful_widget(throbber, chunks[1], &mut app.throbber_state);

    let hint = Paragraph::new("Data from the Korean Film Council")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Left);
    frame.render_widget(hint, chunks[2]);
}
