use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_big_text::{BigText, PixelSize};

/// Renders missing API key error with big text
pub fn render_missing_api_key(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Big text
            Constraint::Min(5),    // Instructions
        ])
        .split(area);

    let big_text = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .lines(vec!["API KEY".into(), "REQUIRED!".into()])
        .alignment(Alignment::Center)
        .build();

    frame.render_widget(big_text, chunks[0]);

    let config_hint = match crate::app::config::config_path() {
        Some(path) => format!("   or put \"kobis_api_key\" in {}", path.display()),
        None => String::new(),
    };

    let instructions = vec![
        Line::from(""),
        Line::from(Span::styled(
            "A KOBIS open API key is needed to load the box office",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "1. Get a key at: https://www.kobis.or.kr/kobisopenapi",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "2. Set environment variable: export KOBIS_API_KEY=your_key_here",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(config_hint, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            "3. Optional: KAKAO_API_KEY enables posters on the detail screen",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "4. Restart the application",
            Style::default().fg(Color::White),
        )),
    ];

    let instructions_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());

    let instructions_paragraph = Paragraph::new(instructions)
        .block(instructions_block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(instructions_paragraph, chunks[1]);
}
