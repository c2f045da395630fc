use chrono::{Datelike, Days, Months, NaiveDate};

use crate::app::date_range::DateRange;

type DateHandler = Box<dyn FnOnce(NaiveDate)>;

/// Modal calendar picker. The handler passed in at construction is called
/// at most once, with the confirmed date; dropping or cancelling the flow
/// never calls it.
pub struct DateSelectionFlow {
    cursor: NaiveDate,
    earliest: NaiveDate,
    latest: NaiveDate,
    on_select: DateHandler,
}

impl DateSelectionFlow {
    pub fn new(current: NaiveDate, range: &DateRange, on_select: impl FnOnce(NaiveDate) + 'static) -> Self {
        let earliest = range.earliest();
        let latest = range.yesterday();
        Self {
            cursor: current.clamp(earliest, latest),
            earliest,
            latest,
            on_select: Box::new(on_select),
        }
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        date >= self.earliest && date <= self.latest
    }

    pub fn move_days(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        self.set_cursor(moved);
    }

    pub fn move_months(&mut self, months: i32) {
        let moved = if months >= 0 {
            self.cursor.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.cursor.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        self.set_cursor(moved);
    }

    fn set_cursor(&mut self, moved: Option<NaiveDate>) {
        if let Some(date) = moved {
            self.cursor = date.clamp(self.earliest, self.latest);
        }
    }

    /// Weeks of the cursor's month, Sunday first. Days outside the month
    /// are `None`.
    pub fn month_grid(&self) -> Vec<[Option<NaiveDate>; 7]> {
        let first = self.cursor.with_day(1).unwrap_or(self.cursor);
        let mut weeks = Vec::new();
        let mut week = [None; 7];
        let mut column = first.weekday().num_days_from_sunday() as usize;

        let mut day = Some(first);
        while let Some(date) = day.filter(|d| d.month() == first.month()) {
            week[column] = Some(date);
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
            day = date.succ_opt();
        }
        if column > 0 {
            weeks.push(week);
        }
        weeks
    }

    /// Hands the cursor date to the handler and closes the picker.
    pub fn confirm(self) -> NaiveDate {
        let date = self.cursor;
        tracing::debug!(%date, "date selected");
        (self.on_select)(date);
        date
    }

    /// Closes the picker without selecting anything.
    pub fn cancel(self) {
        tracing::debug!("date selection cancelled");
    }
}
