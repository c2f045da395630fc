use std::sync::Arc;
use std::sync::mpsc;

use chrono::NaiveDate;
use ratatui::widgets::ListState;

use crate::app::boxoffice::BoxofficeSnapshot;
use crate::app::date_range::{Clock, DateRange};
use crate::app::date_selection::DateSelectionFlow;
use crate::app::error::FetchError;
use crate::app::kobis::{BoxofficeQuery, MovieService};
use crate::app::render::{ListRenderer, PresentationMode, RowViewModel};
use crate::app::state::BoxofficeListState;

/// Where the box office screen is in its fetch cycle.
#[derive(Debug)]
pub enum LoadPhase {
    Idle,
    Loading(NaiveDate),
    Loaded(NaiveDate),
    LoadFailed(FetchError),
}

/// What asked for a (re)load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Appearance,
    PullToRefresh,
    DateChange,
}

/// Result of a background fetch, tagged with the request that produced it.
pub struct FetchMessage {
    generation: u64,
    date: NaiveDate,
    result: Result<BoxofficeSnapshot, FetchError>,
}

/// Drives the box office list: issues fetches, applies their results on
/// the UI thread and keeps the rendered rows in sync.
pub struct BoxofficeScreenController {
    movie_service: Arc<dyn MovieService>,
    clock: Arc<dyn Clock>,
    renderer: ListRenderer,
    state: BoxofficeListState,
    phase: LoadPhase,
    mode: PresentationMode,
    rows: Vec<RowViewModel>,
    title: Option<String>,
    pub list_state: ListState,
    // Bumped per request; responses from older generations are dropped.
    generation: u64,
    sender: mpsc::Sender<FetchMessage>,
    receiver: mpsc::Receiver<FetchMessage>,
    date_sender: mpsc::Sender<NaiveDate>,
    date_receiver: mpsc::Receiver<NaiveDate>,
}

impl BoxofficeScreenController {
    pub fn new(movie_service: Arc<dyn MovieService>, clock: Arc<dyn Clock>, mode: PresentationMode) -> Self {
        let yesterday = DateRange::new(clock.as_ref()).yesterday();
        let (sender, receiver) = mpsc::channel();
        let (date_sender, date_receiver) = mpsc::channel();

        Self {
            movie_service,
            clock,
            renderer: ListRenderer::default(),
            state: BoxofficeListState::new(yesterday),
            phase: LoadPhase::Idle,
            mode,
            rows: Vec::new(),
            title: None,
            list_state: ListState::default(),
            generation: 0,
            sender,
            receiver,
            date_sender,
            date_receiver,
        }
    }

    pub fn state(&self) -> &BoxofficeListState {
        &self.state
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn rows(&self) -> &[RowViewModel] {
        &self.rows
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// Initial load when the screen is shown.
    pub fn appear(&mut self) {
        self.fetch(self.state.date, RefreshReason::Appearance);
    }

    pub fn refresh(&mut self) {
        self.fetch(self.state.date, RefreshReason::PullToRefresh);
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        if !DateRange::new(self.clock.as_ref()).is_valid_selection(date) {
            tracing::warn!(%date, "ignoring date outside the selectable range");
            return;
        }
        self.fetch(date, RefreshReason::DateChange);
    }

    /// Opens a picker whose confirmed date comes back through `poll`.
    pub fn open_date_selection(&self) -> DateSelectionFlow {
        let sender = self.date_sender.clone();
        DateSelectionFlow::new(
            self.state.date,
            &DateRange::new(self.clock.as_ref()),
            move |date| {
                let _ = sender.send(date);
            },
        )
    }

    fn fetch(&mut self, date: NaiveDate, reason: RefreshReason) {
        if let LoadPhase::Loading(previous) = self.phase {
            tracing::debug!(%previous, "superseding in-flight fetch");
        }
        self.generation += 1;
        let generation = self.generation;
        self.state.begin_loading(date);
        self.phase = LoadPhase::Loading(date);
        tracing::info!(%date, ?reason, generation, "fetching box office");

        let service = Arc::clone(&self.movie_service);
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let result = service.fetch_boxoffice(&BoxofficeQuery::for_date(date));
            let _ = sender.send(FetchMessage {
                generation,
                date,
                result,
            });
        });
    }

    /// Applies pending date selections and fetch results. Returns true if
    /// anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Ok(date) = self.date_receiver.try_recv() {
            self.select_date(date);
            changed = true;
        }
        while let Ok(message) = self.receiver.try_recv() {
            changed |= self.apply(message);
        }

        changed
    }

    fn apply(&mut self, message: FetchMessage) -> bool {
        if message.generation != self.generation {
            tracing::debug!(date = %message.date, generation = message.generation, "dropping superseded response");
            return false;
        }

        match message.result {
            Ok(snapshot) => {
                let date = snapshot.date();
                tracing::info!(%date, movies = snapshot.recodes().len(), "box office loaded");
                self.title = Some(date.format("%Y-%m-%d").to_string());
                self.rows = self.renderer.render(&snapshot, self.mode);
                self.state.finish_loading(snapshot);
                self.list_state.select(if self.rows.is_empty() { None } else { Some(0) });
                self.phase = LoadPhase::Loaded(date);
            }
            Err(error) => {
                tracing::error!(date = %message.date, %error, "failed to fetch box office");
                self.state.fail_loading();
                self.phase = LoadPhase::LoadFailed(error);
            }
        }
        true
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        if let Some(snapshot) = &self.state.snapshot {
            self.rows = self.renderer.render(snapshot, self.mode);
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn selected_row(&self) -> Option<&RowViewModel> {
        self.list_state.selected().and_then(|index| self.rows.get(index))
    }

    pub fn next_row(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(index) => (index + 1) % self.rows.len(),
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn previous_row(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let previous = match self.list_state.selected() {
            Some(0) | None => self.rows.len() - 1,
            Some(index) => index - 1,
        };
        self.list_state.select(Some(previous));
    }

    /// Blocks until the newest request has been applied.
    #[cfg(test)]
    pub fn wait_for_fetch(&mut self) {
        while self.state.is_loading {
            let message = self
                .receiver
                .recv_timeout(crate::app::testing::WAIT)
                .expect("fetch did not complete");
            self.apply(message);
        }
    }
}
