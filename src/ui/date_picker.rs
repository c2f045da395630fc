use crate::app::date_selection::DateSelectionFlow;
use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];
const POPUP_WIDTH: u16 = 36;
const POPUP_HEIGHT: u16 = 13;

/// Renders the calendar popup over whatever screen is underneath
pub fn render_date_picker(frame: &mut Frame, flow: &DateSelectionFlow, area: Rect) {
    let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
    frame.render_widget(Clear, popup);

    let cursor = flow.cursor();
    let block = Block::default()
        .title("날짜선택")
        .borders(Borders::ALL)
        .style(Style::default());

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}년 {:02}월", cursor.year(), cursor.month()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            WEEKDAYS
                .iter()
                .enumerate()
                .map(|(column, name)| Span::styled(format!(" {} ", name), weekday_style(column)))
                .collect::<Vec<_>>(),
        ),
    ];

    for week in flow.month_grid() {
        let spans: Vec<Span> = week
            .iter()
            .enumerate()
            .map(|(column, day)| match day {
                None => Span::raw("    "),
                Some(date) => {
                    let style = if *date == cursor {
                        Style::default()
                            .bg(Color::Yellow)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD)
                    } else if !flow.is_selectable(*date) {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        weekday_style(column)
                    };
                    Span::styled(format!(" {:>2} ", date.day()), style)
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("selected {}", cursor.format("%Y-%m-%d")),
        Style::default().fg(Color::Gray),
    )));

    let calendar = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(calendar, popup);
}

fn weekday_style(column: usize) -> Style {
    match column {
        0 => Style::default().fg(Color::Red),
        6 => Style::default().fg(Color::Blue),
        _ => Style::default(),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
