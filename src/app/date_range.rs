use chrono::{Days, Local, NaiveDate};

/// Source of the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the local timezone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Selectable window for box office dates: the distant past up to and
/// including yesterday. Recomputed from the clock on every call.
pub struct DateRange<'a> {
    clock: &'a dyn Clock,
}

impl<'a> DateRange<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock }
    }

    pub fn earliest(&self) -> NaiveDate {
        NaiveDate::MIN
    }

    pub fn yesterday(&self) -> NaiveDate {
        yesterday_of(self.clock.today())
    }

    pub fn is_valid_selection(&self, date: NaiveDate) -> bool {
        date <= self.yesterday()
    }
}

pub fn yesterday_of(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
pub mod test_clock {
    use super::Clock;
    use chrono::{Days, NaiveDate};
    use std::sync::Mutex;

    /// Clock pinned to a day that tests can advance by hand.
    pub struct FixedClock {
        today: Mutex<NaiveDate>,
    }

    impl FixedClock {
        pub fn new(today: NaiveDate) -> Self {
            Self {
                today: Mutex::new(today),
            }
        }

        pub fn advance_days(&self, days: u64) {
            let mut today = self.today.lock().unwrap();
            *today = *today + Days::new(days);
        }
    }

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            *self.today.lock().unwrap()
        }
    }
}
