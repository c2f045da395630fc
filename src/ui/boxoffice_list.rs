use crate::app::App;
use crate::app::render::{PresentationMode, RankChange, RowViewModel};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

const CARD_HEIGHT: u16 = 7;
const CARD_COLUMNS: usize = 2;

/// Renders the ranking in the mode its rows were built for
pub fn render_boxoffice_list(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.boxoffice.rows().first().map(|row| row.mode) {
        Some(PresentationMode::Compact) => render_compact(frame, app, area),
        Some(PresentationMode::Card) => render_cards(frame, app, area),
        None => {
            let empty_block = Block::default()
                .title("No box office loaded - press 'r' to refresh or 'd' to pick a date")
                .borders(Borders::ALL)
                .style(Style::default());

            frame.render_widget(empty_block, area);
        }
    }
}

/// Spans for the rank movement: red "new" marker, red up / blue down
/// triangles, plain dash when unchanged
fn rank_change_spans(change: &RankChange) -> Vec<Span<'static>> {
    match change {
        RankChange::NewEntry => vec![Span::styled(
            change.label(),
            Style::default().fg(Color::Red),
        )],
        RankChange::Steady => vec![Span::raw(change.label())],
        RankChange::Up(_) => vec![
            Span::styled(change.glyph().unwrap_or_default(), Style::default().fg(Color::Red)),
            Span::raw(change.label()),
        ],
        RankChange::Down(_) => vec![
            Span::styled(change.glyph().unwrap_or_default(), Style::default().fg(Color::Blue)),
            Span::raw(change.label()),
        ],
    }
}

fn render_compact(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = format!("Box Office ({} movies)", app.boxoffice.rows().len());

    let items: Vec<ListItem> = app
        .boxoffice
        .rows()
        .iter()
        .map(|row| {
            let mut first = vec![
                Span::styled(
                    format!("{:>3}  ", row.rank),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    row.title.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
            ];
            first.extend(rank_change_spans(&row.rank_change));

            let content = vec![
                Line::from(first),
                Line::from(Span::styled(
                    format!("     {}", row.audience),
                    Style::default().fg(Color::Gray),
                )),
            ];

            ListItem::new(content)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.boxoffice.list_state);
}

fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let outer_block = Block::default()
        .title(format!("Box Office ({} movies)", app.boxoffice.rows().len()))
        .borders(Borders::ALL);
    let inner = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    let rows = app.boxoffice.rows();
    let selected = app.boxoffice.selected_index().unwrap_or(0);
    let visible_lines = ((inner.height / CARD_HEIGHT) as usize).max(1);
    let first_line = first_visible_line(selected / CARD_COLUMNS, visible_lines);

    let line_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_lines])
        .split(inner);

    for (offset, line_area) in line_areas.iter().enumerate() {
        let start = (first_line + offset) * CARD_COLUMNS;
        if start >= rows.len() {
            break;
        }
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(*line_area);

        for (column, card_area) in columns.iter().enumerate() {
            let index = start + column;
            if let Some(row) = rows.get(index) {
                render_card(frame, row, *card_area, index == selected);
            }
        }
    }
}

/// Scrolls just enough to keep the selected grid line on screen
fn first_visible_line(selected_line: usize, visible_lines: usize) -> usize {
    (selected_line + 1).saturating_sub(visible_lines)
}

fn render_card(frame: &mut Frame, row: &RowViewModel, area: Rect, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let block = Block::default().borders(Borders::ALL).border_style(border_style);

    let content = vec![
        Line::from(Span::styled(
            row.rank.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            row.title.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(rank_change_spans(&row.rank_change)),
        Line::from(Span::styled(
            row.audience.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let card = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_scrolls_to_selection() {
        assert_eq!(first_visible_line(0, 3), 0);
        assert_eq!(first_visible_line(2, 3), 0);
        assert_eq!(first_visible_line(3, 3), 1);
        assert_eq!(first_visible_line(4, 1), 4);
    }

    #[test]
    fn rank_change_colors() {
        let spans = rank_change_spans(&RankChange::NewEntry);
        assert_eq!(spans[0].content, "신규");
        assert_eq!(spans[0].style.fg, Some(Color::Red));

        let spans = rank_change_spans(&RankChange::Steady);
        assert_eq!(spans[0].content, "-");
        assert_eq!(spans[0].style.fg, None);

        let spans = rank_change_spans(&RankChange::Up(3));
        assert_eq!(spans[0].content, "▲");
        assert_eq!(spans[0].style.fg, Some(Color::Red));
        assert_eq!(spans[1].content, "3");
        assert_eq!(spans[1].style.fg, None);

        let spans = rank_change_spans(&RankChange::Down(2));
        assert_eq!(spans[0].style.fg, Some(Color::Blue));
        assert_eq!(spans[1].content, "2");
    }
}
