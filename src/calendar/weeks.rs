use super::util::{add_days, week_start, WeekStart, DAYS_IN_WEEK};
use std::fmt;
use thiserror::Error;
use time::{Date, Duration};

/// The seven consecutive days of a displayed week.  Always derived from an
/// anchor date; never stored apart from one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
// Invariant: `end` is six days after `start`, and `start` is the first day of
// the week under the convention it was resolved with
pub struct WeekRange {
    start: Date,
    end: Date,
}

impl WeekRange {
    /// Resolves the week containing `date`.  Fails only for the partial weeks
    /// at either end of the representable calendar.
    pub fn containing(date: Date, convention: WeekStart) -> Result<WeekRange, OutOfTimeError> {
        let start = week_start(date, convention).ok_or(OutOfTimeError)?;
        let end = add_days(start, 6).ok_or(OutOfTimeError)?;
        Ok(WeekRange { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn days(&self) -> [Date; DAYS_IN_WEEK] {
        [0, 1, 2, 3, 4, 5, 6].map(|n| self.start.saturating_add(Duration::days(n)))
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;
