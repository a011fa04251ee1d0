use chrono::{Local, NaiveDateTime, SubsecRound};

/// Source of "now" for timestamps written into tasks.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time truncated to whole seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }
}

/// Clock pinned to a single instant, for tests and reproducible runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
