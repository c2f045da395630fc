use chrono::NaiveDate;

use crate::app::boxoffice::BoxofficeSnapshot;

/// What the box office screen currently knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxofficeListState {
    pub date: NaiveDate,
    pub snapshot: Option<BoxofficeSnapshot>,
    pub is_loading: bool,
}

impl BoxofficeListState {
    /// Starts on `date` with nothing loaded yet.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            snapshot: None,
            is_loading: false,
        }
    }

    pub fn begin_loading(&mut self, date: NaiveDate) {
        self.date = date;
        self.is_loading = true;
    }

    pub fn finish_loading(&mut self, snapshot: BoxofficeSnapshot) {
        self.snapshot = Some(snapshot);
        self.is_loading = false;
    }

    /// Keeps whatever snapshot was there before.
    pub fn fail_loading(&mut self) {
        self.is_loading = false;
    }
}
