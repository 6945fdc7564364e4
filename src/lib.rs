//! A seven-day "week strip": a row of dates for the visible week, plus one
//! content slot per day.
//!
//! [`WeekStrip`] works out which week is visible from an anchor date. It
//! asks the host for each day's content and decides what to show: one row
//! per day, only the days with content, or a single placeholder for a week
//! with nothing in it.  Drawing the result is left to the host; the content
//! type is a type parameter and is never inspected.
//!
//! ```
//! use time::macros::date;
//! use weekstrip::{Direction, WeekBody, WeekStrip};
//!
//! let mut strip = WeekStrip::builder(date!(2024 - 01 - 10))
//!     .render_day_content(|d| (d.day() % 2 == 0).then_some("even"))
//!     .show_empty_days(false)
//!     .build()?;
//! assert_eq!(strip.range().start(), date!(2024 - 01 - 07));
//! strip.navigate(Direction::Next)?;
//! assert_eq!(strip.range().start(), date!(2024 - 01 - 14));
//! let WeekBody::Rows(rows) = strip.body() else {
//!     unreachable!()
//! };
//! assert_eq!(rows.len(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod calendar;
pub use crate::calendar::*;
