pub mod boxoffice;
pub mod config;
pub mod controller;
pub mod date_range;
pub mod date_selection;
pub mod detail;
pub mod error;
pub mod kakao;
pub mod kobis;
pub mod render;
pub mod state;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use ratatui_image::picker::Picker;
use throbber_widgets_tui::ThrobberState;

use crate::app::config::Config;
use crate::app::controller::BoxofficeScreenController;
use crate::app::date_range::Clock;
use crate::app::date_selection::DateSelectionFlow;
use crate::app::detail::{MovieDetailScreen, NavigationStack};
use crate::app::kakao::ImageService;
use crate::app::kobis::MovieService;
use crate::app::render::PresentationMode;

pub enum CurrentScreen {
    Boxoffice,
    DateSelection,
    MovieDetail,
    Exiting,
}

pub struct App {
    pub config: Config,
    pub movie_service: Arc<dyn MovieService>,
    pub image_service: Arc<dyn ImageService>,
    pub boxoffice: BoxofficeScreenController,
    pub date_selection: Option<DateSelectionFlow>,
    pub navigation: NavigationStack<MovieDetailScreen>,
    pub throbber_state: ThrobberState,
    pub picker: Option<Picker>,
    pub exiting: bool,
}

impl App {
    pub fn new(
        config: Config,
        movie_service: Arc<dyn MovieService>,
        image_service: Arc<dyn ImageService>,
        clock: Arc<dyn Clock>,
        picker: Option<Picker>,
    ) -> Self {
        let mode = if config.compact_list {
            PresentationMode::Compact
        } else {
            PresentationMode::Card
        };
        let boxoffice = BoxofficeScreenController::new(Arc::clone(&movie_service), clock, mode);

        Self {
            config,
            movie_service,
            image_service,
            boxoffice,
            date_selection: None,
            navigation: NavigationStack::default(),
            throbber_state: ThrobberState::default(),
            picker,
            exiting: false,
        }
    }

    pub fn current_screen(&self) -> CurrentScreen {
        if self.exiting {
            CurrentScreen::Exiting
        } else if self.date_selection.is_some() {
            CurrentScreen::DateSelection
        } else if !self.navigation.is_root() {
            CurrentScreen::MovieDetail
        } else {
            CurrentScreen::Boxoffice
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.config.has_kobis_key()
    }

    /// First load, skipped until a KOBIS key is configured.
    pub fn start(&mut self) {
        if self.has_api_key() {
            self.boxoffice.appear();
        } else {
            tracing::warn!("KOBIS_API_KEY is not set; box office will not load");
        }
    }

    /// Called once per UI loop iteration.
    pub fn tick(&mut self) {
        self.boxoffice.poll();
        if let Some(screen) = self.navigation.top_mut() {
            screen.poll(self.picker.as_ref());
        }
        self.throbber_state.calc_next();
    }

    pub fn refresh(&mut self) {
        if self.has_api_key() {
            self.boxoffice.refresh();
        }
    }

    pub fn open_date_selection(&mut self) {
        if self.date_selection.is_none() {
            self.date_selection = Some(self.boxoffice.open_date_selection());
        }
    }

    pub fn confirm_date_selection(&mut self) {
        if let Some(flow) = self.date_selection.take() {
            flow.confirm();
            self.boxoffice.poll();
        }
    }

    pub fn cancel_date_selection(&mut self) {
        if let Some(flow) = self.date_selection.take() {
            flow.cancel();
        }
    }

    pub fn open_selected_detail(&mut self) {
        let request = detail::activate(
            self.boxoffice.selected_row(),
            &self.movie_service,
            &self.image_service,
        );
        if let Some(request) = request {
            self.navigation.push(MovieDetailScreen::open(request));
        }
    }

    pub fn go_back(&mut self) {
        self.navigation.pop();
    }
}
