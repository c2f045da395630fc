use crate::app::{App, CurrentScreen};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Text,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Returns the appropriate instruction text based on app state
fn get_instruction_text(app: &App) -> &'static str {
    match app.current_screen() {
        CurrentScreen::Boxoffice => {
            if !app.has_api_key() {
                "(q) to quit"
            } else if app.boxoffice.rows().is_empty() {
                "(r) refresh, (d) pick date, (q) quit"
            } else {
                "(↑↓/jk) move, (Enter) details, (d) pick date, (r) refresh, (v) view, (q) quit"
            }
        }
        CurrentScreen::DateSelection => {
            "(←→/hl) day, (↑↓/jk) week, ([ ]) month, (Enter) select, (Esc) cancel"
        }
        CurrentScreen::MovieDetail => "(Esc/b) back, (q) quit",
        CurrentScreen::Exiting => "Quit? (y) to confirm, (n) to cancel",
    }
}

/// Renders the footer with instructions at the bottom of the screen
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let bottom_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());

    let instruction_text = get_instruction_text(app);
    let bottom = Paragraph::new(Text::styled(instruction_text, Style::default()))
        .block(bottom_block);

    frame.render_widget(bottom, area);
}
