mod app;
use app::App;

mod ui;

use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ratatui::Terminal;
use ratatui::crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::{Backend, CrosstermBackend};
use ratatui_image::picker::Picker;
use tracing_subscriber::EnvFilter;

use crate::app::CurrentScreen;
use crate::app::config::{self, Config};
use crate::app::date_range::SystemClock;
use crate::app::kakao::KakaoImageService;
use crate::app::kobis::KobisMovieService;

/// Sends tracing output to a log file; the terminal belongs to the UI.
fn init_logging() {
    let Some(path) = config::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = File::options().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let config = Config::load();

    // setup terminal
    enable_raw_mode()?;
    let mut stderr = io::stderr(); // This is a special case. Normally using stdout is fine
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let picker = match Picker::from_query_stdio() {
        Ok(picker) => Some(picker),
        Err(error) => {
            tracing::warn!(?error, "terminal image query failed; posters disabled");
            None
        }
    };

    // create app and run it
    let movie_service = Arc::new(KobisMovieService::new(config.kobis_api_key.clone()));
    let image_service = Arc::new(KakaoImageService::new(config.kakao_api_key.clone()));
    let mut app = App::new(config, movie_service, image_service, Arc::new(SystemClock), picker);
    app.start();
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(error) = &result {
        tracing::error!(%error, "terminal loop failed");
    }
    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>>
where
    B::Error: Error + 'static,
{
    loop {
        app.tick();
        terminal.draw(|f| ui::ui(f, app))?;

        // Poll for events with a timeout to allow UI updates
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Release {
                    // Skip events that are not KeyEventKind::Press
                    continue;
                }

                match app.current_screen() {
                    CurrentScreen::Boxoffice => match key.code {
                        KeyCode::Char('q') => app.exiting = true,
                        KeyCode::Char('r') => app.refresh(),
                        KeyCode::Char('d') if app.has_api_key() => app.open_date_selection(),
                        KeyCode::Char('v') => app.boxoffice.toggle_mode(),
                        KeyCode::Down | KeyCode::Char('j') => app.boxoffice.next_row(),
                        KeyCode::Up | KeyCode::Char('k') => app.boxoffice.previous_row(),
                        KeyCode::Enter => app.open_selected_detail(),
                        _ => {}
                    },
                    CurrentScreen::DateSelection => match key.code {
                        KeyCode::Enter => app.confirm_date_selection(),
                        KeyCode::Esc | KeyCode::Char('q') => app.cancel_date_selection(),
                        code => {
                            if let Some(flow) = app.date_selection.as_mut() {
                                match code {
                                    KeyCode::Left | KeyCode::Char('h') => flow.move_days(-1),
                                    KeyCode::Right | KeyCode::Char('l') => flow.move_days(1),
                                    KeyCode::Up | KeyCode::Char('k') => flow.move_days(-7),
                                    KeyCode::Down | KeyCode::Char('j') => flow.move_days(7),
                                    KeyCode::Char('[') => flow.move_months(-1),
                                    KeyCode::Char(']') => flow.move_months(1),
                                    _ => {}
                                }
                            }
                        }
                    },
                    CurrentScreen::MovieDetail => match key.code {
                        KeyCode::Char('q') => app.exiting = true,
                        KeyCode::Esc | KeyCode::Char('b') => app.go_back(),
                        _ => {}
                    },
                    CurrentScreen::Exiting => match key.code {
                        KeyCode::Char('y') => {
                            return Ok(());
                        }
                        KeyCode::Char('n') | KeyCode::Esc => {
                            app.exiting = false;
                        }
                        _ => {}
                    },
                }
            }
        }
    }
}
