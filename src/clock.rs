//! Wall-clock source for record ids and dates

use std::cell::Cell;

use chrono::{Local, NaiveDate};

/// Date format for `joinedDate` / fee `date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Clock {
    /// Unix time in milliseconds
    fn now_millis(&self) -> i64;
    /// Today's local calendar date
    fn today(&self) -> String;
}

/// Local system time (browser time on wasm)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }

    fn today(&self) -> String {
        Local::now().format(DATE_FORMAT).to_string()
    }
}

/// Hand-driven clock. Each read of `now_millis` advances by `step`.
#[derive(Debug)]
pub struct ManualClock {
    millis: Cell<i64>,
    step: i64,
    date: NaiveDate,
}

impl ManualClock {
    pub fn new(start_millis: i64, step: i64, date: NaiveDate) -> Self {
        Self {
            millis: Cell::new(start_millis),
            step,
            date,
        }
    }

    /// A clock that never moves
    pub fn frozen(millis: i64, date: NaiveDate) -> Self {
        Self::new(millis, 0, date)
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        let now = self.millis.get();
        self.millis.set(now + self.step);
        now
    }

    fn today(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
