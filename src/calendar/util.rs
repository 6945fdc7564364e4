use std::str::FromStr;
use thiserror::Error;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Index of the middle day of a week, used to pick the month label so that a
/// week straddling two months is labelled by the month holding most of it
const MID_WEEK: usize = 3;

/// Which weekday a displayed week begins on
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn first_weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sunday,
            WeekStart::Monday => Weekday::Monday,
        }
    }

    /// Number of days between the first day of the week and `wd`
    pub fn offset(self, wd: Weekday) -> u8 {
        match self {
            WeekStart::Sunday => wd.number_days_from_sunday(),
            WeekStart::Monday => wd.number_days_from_monday(),
        }
    }

    /// Column at which Sunday is displayed
    pub fn sunday_index(self) -> usize {
        usize::from(self.offset(Weekday::Sunday))
    }

    /// Column at which Saturday is displayed
    pub fn saturday_index(self) -> usize {
        usize::from(self.offset(Weekday::Saturday))
    }

    /// The days of the week in display order
    pub fn weekdays(self) -> [Weekday; DAYS_IN_WEEK] {
        let mut wd = self.first_weekday();
        std::array::from_fn(|_| {
            let current = wd;
            wd = wd.next();
            current
        })
    }
}

impl FromStr for WeekStart {
    type Err = ParseWeekStartError;

    fn from_str(s: &str) -> Result<WeekStart, ParseWeekStartError> {
        match s.to_ascii_lowercase().as_str() {
            "sun" | "sunday" => Ok(WeekStart::Sunday),
            "mon" | "monday" => Ok(WeekStart::Monday),
            _ => Err(ParseWeekStartError),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error(r#"invalid start of week; expected "sun" or "mon""#)]
pub struct ParseWeekStartError;

/// Language used for weekday names
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Locale {
    #[default]
    English,
    Korean,
}

impl Locale {
    /// Two-column abbreviation shown above each date in the week bar
    pub fn short_weekday(self, wd: Weekday) -> &'static str {
        let i = usize::from(wd.number_days_from_sunday());
        match self {
            Locale::English => ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"][i],
            Locale::Korean => ["일", "월", "화", "수", "목", "금", "토"][i],
        }
    }

    pub fn weekday_name(self, wd: Weekday) -> &'static str {
        let i = usize::from(wd.number_days_from_sunday());
        match self {
            Locale::English => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"][i],
            Locale::Korean => ["일", "월", "화", "수", "목", "금", "토"][i],
        }
    }
}

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Locale, ParseLocaleError> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "ko" | "korean" => Ok(Locale::Korean),
            _ => Err(ParseLocaleError),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error(r#"invalid locale; expected "en" or "ko""#)]
pub struct ParseLocaleError;

/// Anything that falls on a single calendar day.  Time of day, if any, is
/// discarded.
pub trait CalendarDay {
    fn calendar_day(&self) -> Date;
}

impl CalendarDay for Date {
    fn calendar_day(&self) -> Date {
        *self
    }
}

impl CalendarDay for PrimitiveDateTime {
    fn calendar_day(&self) -> Date {
        self.date()
    }
}

impl CalendarDay for OffsetDateTime {
    fn calendar_day(&self) -> Date {
        self.date()
    }
}

/// Returns the first day of the week containing `date`, or `None` if that day
/// precedes the earliest representable date
pub fn week_start(date: Date, convention: WeekStart) -> Option<Date> {
    add_days(date, -i64::from(convention.offset(date.weekday())))
}

/// Moves `n` calendar days forwards (or backwards if negative).  Operates on
/// calendar days, so there is no clock time for a DST transition to skew.
pub fn add_days(date: Date, n: i64) -> Option<Date> {
    date.checked_add(Duration::days(n))
}

pub fn same_day<A: CalendarDay, B: CalendarDay>(a: &A, b: &B) -> bool {
    a.calendar_day() == b.calendar_day()
}

/// `YYYY.MM` of the middle day of the week
pub fn month_label(days: &[Date; DAYS_IN_WEEK]) -> String {
    let mid = days[MID_WEEK];
    format!("{:04}.{:02}", mid.year(), u8::from(mid.month()))
}

/// `YYYY.MM.DD (Wkd)`
pub fn full_label(date: Date, locale: Locale) -> String {
    format!(
        "{:04}.{:02}.{:02} ({})",
        date.year(),
        u8::from(date.month()),
        date.day(),
        locale.weekday_name(date.weekday())
    )
}
