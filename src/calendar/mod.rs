mod anchor;
mod strip;
mod util;
mod weeks;
pub use self::anchor::{AnchorError, AnchorOwnership, Direction};
pub use self::strip::{
    ColumnKind, DaySlot, Header, SlotContent, WeekBarColumn, WeekBody, WeekStrip,
    WeekStripBuilder,
};
pub use self::util::{
    add_days, full_label, month_label, same_day, week_start, CalendarDay, Locale,
    ParseLocaleError, ParseWeekStartError, WeekStart,
};
pub use self::weeks::{OutOfTimeError, WeekRange};
