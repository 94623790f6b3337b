use chrono::{Local, NaiveDate, NaiveDateTime};

/// A seam for `today()`/`now()` so a host embedding the evaluator can inject
/// a fixed clock in tests instead of reading the system clock.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
