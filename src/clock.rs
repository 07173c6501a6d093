use chrono::{Local, NaiveDate};

/// Source of "today" for the live statement period.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The portal shows dates in the user's local calendar, so "today" is local too.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}
