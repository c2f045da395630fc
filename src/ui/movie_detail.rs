use crate::app::App;
use crate::app::boxoffice::MovieInfo;
use crate::app::detail::{Loadable, MovieDetailScreen};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState, WhichUse};

/// Renders the movie detail screen on top of the navigation stack
pub fn render_movie_detail(frame: &mut Frame, app: &mut App, area: Rect) {
    let App {
        navigation,
        picker,
        throbber_state,
        ..
    } = app;
    let has_picker = picker.is_some();
    let Some(screen) = navigation.top_mut() else {
        return;
    };

    let outer_block = Block::default()
        .title(format!(
            "Movie Details - {} ({})",
            screen.movie_title(),
            screen.movie_code()
        ))
        .borders(Borders::ALL)
        .style(Style::default());
    let inner_area = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35), // Poster
            Constraint::Min(20),        // Info
        ])
        .split(inner_area);

    render_poster_section(frame, chunks[0], screen, has_picker, throbber_state);

    match &screen.info {
        Loadable::Loading => render_loading_state(frame, chunks[1], throbber_state),
        Loadable::Failed(error) => render_error_state(frame, chunks[1], error),
        Loadable::Ready(info) => render_movie_info(frame, chunks[1], info),
    }
}

/// Draws a spinning throbber on the third line of `area`
fn render_throbber(frame: &mut Frame, area: Rect, label: &'static str, state: &mut ThrobberState) {
    let line = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .split(area)[1];

    let throbber = Throbber::default()
        .label(label)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);
    frame.render_stateful_widget(throbber, line, state);
}

fn render_loading_state(frame: &mut Frame, area: Rect, state: &mut ThrobberState) {
    render_throbber(frame, area, "Fetching movie details from KOBIS...", state);
}

fn placeholder(frame: &mut Frame, area: Rect, text: String, style: Style) {
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(""), Line::from(Span::styled(text, style))])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Poster"));
    frame.render_widget(paragraph, area);
}

/// Renders the poster section
fn render_poster_section(
    frame: &mut Frame,
    area: Rect,
    screen: &mut MovieDetailScreen,
    has_picker: bool,
    throbber_state: &mut ThrobberState,
) {
    if let Some(protocol) = &mut screen.poster_protocol {
        let image = StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None));

        let poster_block = Block::default().borders(Borders::ALL).title("Poster");
        let inner_area = poster_block.inner(area);
        frame.render_widget(poster_block, area);
        frame.render_stateful_widget(image, inner_area, protocol);
        return;
    }

    match &screen.poster {
        Loadable::Loading => {
            let poster_block = Block::default().borders(Borders::ALL).title("Poster");
            let inner_area = poster_block.inner(area);
            frame.render_widget(poster_block, area);
            render_throbber(frame, inner_area, "Downloading poster...", throbber_state);
        }
        Loadable::Failed(error) => placeholder(
            frame,
            area,
            format!("Poster unavailable: {}", error),
            Style::default().fg(Color::Red),
        ),
        Loadable::Ready(Some(_)) if !has_picker => placeholder(
            frame,
            area,
            "This terminal cannot display images".to_string(),
            Style::default().fg(Color::Gray),
        ),
        Loadable::Ready(_) => placeholder(
            frame,
            area,
            "No poster available".to_string(),
            Style::default().fg(Color::Gray),
        ),
    }
}

/// Renders error state
fn render_error_state(frame: &mut Frame, area: Rect, error: &str) {
    let error_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Failed to fetch movie details",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(error, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "Press (Esc) or (b) to go back",
            Style::default().fg(Color::Gray),
        )),
    ];

    let error_paragraph = Paragraph::new(error_text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            label,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn or_na(values: &[String]) -> String {
    if values.is_empty() {
        "N/A".to_string()
    } else {
        values.join(", ")
    }
}

/// Renders movie information
fn render_movie_info(frame: &mut Frame, area: Rect, info: &MovieInfo) {
    let mut content = vec![
        Line::from(vec![
            Span::styled(
                info.movie_name.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("({})", info.production_year),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];
    if !info.movie_name_en.is_empty() {
        content.push(Line::from(Span::styled(
            info.movie_name_en.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    content.push(Line::from(""));

    let open_date = info
        .open_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let runtime = info
        .show_time_minutes
        .map(|minutes| format!("{}분", minutes))
        .unwrap_or_else(|| "N/A".to_string());

    content.push(field("감독: ", or_na(&info.directors)));
    content.push(field("개봉: ", open_date));
    content.push(field("상영시간: ", runtime));
    content.push(field("관람등급: ", info.watch_grade.clone().unwrap_or_else(|| "N/A".to_string())));
    content.push(field("제작국가: ", or_na(&info.nations)));
    content.push(field("장르: ", or_na(&info.genres)));
    content.push(field("제작상태: ", info.production_status.clone()));
    content.push(field("영화유형: ", info.type_name.clone()));
    content.push(Line::from(""));

    content.push(Line::from(Span::styled(
        "배우:",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    if info.actors.is_empty() {
        content.push(Line::from("  N/A"));
    }
    for actor in &info.actors {
        let mut spans = vec![Span::raw(format!("  {}", actor.name))];
        if !actor.cast.is_empty() {
            spans.push(Span::styled(
                format!(" ({})", actor.cast),
                Style::default().fg(Color::Gray),
            ));
        }
        content.push(Line::from(spans));
    }

    let content_paragraph = Paragraph::new(content).wrap(Wrap { trim: true });
    frame.render_widget(content_paragraph, area);
}
