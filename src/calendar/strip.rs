use super::anchor::{
    AnchorController, AnchorError, AnchorOwnership, DateHandler, Direction, Proposal,
    RangeHandler, WeekChangeNotifier,
};
use super::util::{full_label, month_label, same_day, Locale, WeekStart, DAYS_IN_WEEK};
use super::weeks::{OutOfTimeError, WeekRange};
use std::fmt;
use time::Date;

type ContentSource<C> = Box<dyn FnMut(Date) -> Option<C>>;

/// What the host supplied for a single day
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SlotContent<C> {
    Filled(C),
    /// The host was asked and has nothing for this day
    Empty,
    /// The host does not supply per-day content at all
    Unsupplied,
}

impl<C> SlotContent<C> {
    pub fn is_empty(&self) -> bool {
        matches!(self, SlotContent::Empty)
    }

    pub fn filled(&self) -> Option<&C> {
        match self {
            SlotContent::Filled(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DaySlot<C> {
    pub date: Date,
    pub content: SlotContent<C>,
}

/// The part of the strip below the week bar
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WeekBody<'a, C> {
    /// Every day came back empty, so a single placeholder stands in for the
    /// whole week.
    Collapsed(&'a C),
    /// One row per displayed day, in date order
    Rows(Vec<&'a DaySlot<C>>),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ColumnKind {
    Weekday,
    Saturday,
    Sunday,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WeekBarColumn {
    pub label: &'static str,
    pub date: Date,
    pub kind: ColumnKind,
    pub is_today: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header<'a, C> {
    pub left: Option<&'a C>,
    pub title: String,
    pub right: Option<&'a C>,
}

/// Everything derived from one anchor.  Replaced as a whole, never patched.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Resolved<C> {
    range: WeekRange,
    slots: [DaySlot<C>; DAYS_IN_WEEK],
    all_empty: bool,
}

/// A seven-day strip of dates with a content slot per day.
///
/// The visible week is derived from an anchor date, which is owned either by
/// the strip or by the host depending on the [`AnchorOwnership`] chosen when
/// building it.  Every change of anchor re-resolves the week and re-queries
/// all seven days at once.
pub struct WeekStrip<C> {
    today: Date,
    convention: WeekStart,
    locale: Locale,
    anchor: AnchorController,
    notifier: WeekChangeNotifier,
    on_date_click: Option<DateHandler>,
    render_day_content: Option<ContentSource<C>>,
    show_empty_days: bool,
    empty_week_data: Option<C>,
    left_header: Option<C>,
    right_header: Option<C>,
    resolved: Resolved<C>,
}

impl<C> WeekStrip<C> {
    /// `today` is used for the initial anchor and for highlighting.  It is
    /// fixed for the life of the strip.
    pub fn builder(today: Date) -> WeekStripBuilder<C> {
        WeekStripBuilder::new(today)
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub fn start_of_week(&self) -> WeekStart {
        self.convention
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_controlled(&self) -> bool {
        self.anchor.is_controlled()
    }

    pub fn anchor_date(&self) -> Date {
        self.anchor.anchor()
    }

    pub fn range(&self) -> WeekRange {
        self.resolved.range
    }

    pub fn days(&self) -> [Date; DAYS_IN_WEEK] {
        self.resolved.range.days()
    }

    pub fn slots(&self) -> &[DaySlot<C>; DAYS_IN_WEEK] {
        &self.resolved.slots
    }

    /// True iff per-day content is supplied and every day of the week came
    /// back empty
    pub fn is_week_empty(&self) -> bool {
        self.resolved.all_empty
    }

    pub fn shows_empty_days(&self) -> bool {
        self.show_empty_days
    }

    pub fn month_label(&self) -> String {
        month_label(&self.days())
    }

    pub fn full_label(&self, date: Date) -> String {
        full_label(date, self.locale)
    }

    pub fn header(&self) -> Header<'_, C> {
        Header {
            left: self.left_header.as_ref(),
            title: self.month_label(),
            right: self.right_header.as_ref(),
        }
    }

    pub fn week_bar(&self) -> [WeekBarColumn; DAYS_IN_WEEK] {
        let sunday = self.convention.sunday_index();
        let saturday = self.convention.saturday_index();
        let days = self.days();
        let weekdays = self.convention.weekdays();
        std::array::from_fn(|i| WeekBarColumn {
            label: self.locale.short_weekday(weekdays[i]),
            date: days[i],
            kind: if i == saturday {
                ColumnKind::Saturday
            } else if i == sunday {
                ColumnKind::Sunday
            } else {
                ColumnKind::Weekday
            },
            is_today: same_day(&days[i], &self.today),
        })
    }

    /// Reconciles the day slots into what should be displayed: either the
    /// empty-week placeholder or the rows that survive empty-day suppression
    pub fn body(&self) -> WeekBody<'_, C> {
        if self.resolved.all_empty {
            if let Some(placeholder) = self.empty_week_data.as_ref() {
                return WeekBody::Collapsed(placeholder);
            }
        }
        // Only slots the host explicitly left empty are ever suppressed;
        // `Unsupplied` slots always get a row.
        WeekBody::Rows(
            self.resolved
                .slots
                .iter()
                .filter(|slot| self.show_empty_days || !slot.content.is_empty())
                .collect(),
        )
    }

    /// Moves the anchor one week back or forwards.  For a host-owned anchor,
    /// this only proposes the new date to the host.
    pub fn navigate(&mut self, direction: Direction) -> Result<(), AnchorError> {
        let proposal = self.anchor.navigate(direction)?;
        self.apply(proposal)
    }

    /// Moves the anchor to `date`, subject to the same ownership rules as
    /// [`WeekStrip::navigate()`]
    pub fn jump_to(&mut self, date: Date) -> Result<(), AnchorError> {
        let proposal = self.anchor.propose(date)?;
        self.apply(proposal)
    }

    pub fn jump_to_today(&mut self) -> Result<(), AnchorError> {
        self.jump_to(self.today)
    }

    /// Supplies the current value of a host-owned anchor.  Fails with
    /// [`AnchorError::Uncontrolled`] if the strip owns its anchor.
    pub fn set_anchor_date(&mut self, date: Date) -> Result<(), AnchorError> {
        self.anchor.check_external()?;
        self.recompute(date)?;
        Ok(())
    }

    /// Re-queries the content of every day of the current week
    pub fn refresh(&mut self) {
        let anchor = self.anchor.anchor();
        // The current anchor was resolved once already, so this cannot fail.
        if let Err(e) = self.recompute(anchor) {
            log::warn!("Failed to refresh week at {anchor}: {e}");
        }
    }

    pub fn click_date(&mut self, date: Date) {
        log::debug!("Date {date} activated");
        if let Some(handler) = self.on_date_click.as_mut() {
            handler(date);
        }
    }

    /// Changing this only affects [`WeekStrip::body()`]; the week is not
    /// recomputed.
    pub fn set_show_empty_days(&mut self, show: bool) {
        self.show_empty_days = show;
    }

    fn apply(&mut self, proposal: Proposal) -> Result<(), AnchorError> {
        if let Proposal::Keep(date) = proposal {
            self.recompute(date)?;
        }
        Ok(())
    }

    fn recompute(&mut self, anchor: Date) -> Result<(), OutOfTimeError> {
        let resolved = resolve(
            anchor,
            self.convention,
            self.render_day_content.as_mut(),
        )?;
        let range = resolved.range;
        self.anchor.store(anchor);
        self.resolved = resolved;
        self.notifier.observe(range);
        Ok(())
    }
}

fn resolve<C>(
    anchor: Date,
    convention: WeekStart,
    mut source: Option<&mut ContentSource<C>>,
) -> Result<Resolved<C>, OutOfTimeError> {
    let range = WeekRange::containing(anchor, convention)?;
    log::debug!("Resolving week {range} from anchor {anchor}");
    let slots = range.days().map(|date| DaySlot {
        date,
        content: match source.as_mut() {
            Some(lookup) => lookup(date).map_or(SlotContent::Empty, SlotContent::Filled),
            None => SlotContent::Unsupplied,
        },
    });
    let all_empty = slots.iter().all(|slot| slot.content.is_empty());
    Ok(Resolved {
        range,
        slots,
        all_empty,
    })
}

impl<C: fmt::Debug> fmt::Debug for WeekStrip<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeekStrip")
            .field("today", &self.today)
            .field("convention", &self.convention)
            .field("locale", &self.locale)
            .field("anchor", &self.anchor)
            .field("notifier", &self.notifier)
            .field("on_date_click", &self.on_date_click.as_ref().map(|_| ".."))
            .field(
                "render_day_content",
                &self.render_day_content.as_ref().map(|_| ".."),
            )
            .field("show_empty_days", &self.show_empty_days)
            .field("empty_week_data", &self.empty_week_data)
            .field("left_header", &self.left_header)
            .field("right_header", &self.right_header)
            .field("resolved", &self.resolved)
            .finish()
    }
}

/// Configuration for a [`WeekStrip`]
pub struct WeekStripBuilder<C> {
    today: Date,
    convention: WeekStart,
    locale: Locale,
    ownership: Option<AnchorOwnership>,
    // Set when more than one ownership setter was called
    ownership_conflict: bool,
    on_anchor_date_change: Option<DateHandler>,
    on_week_change: Option<RangeHandler>,
    on_date_click: Option<DateHandler>,
    render_day_content: Option<ContentSource<C>>,
    show_empty_days: bool,
    empty_week_data: Option<C>,
    left_header: Option<C>,
    right_header: Option<C>,
}

impl<C> WeekStripBuilder<C> {
    fn new(today: Date) -> Self {
        WeekStripBuilder {
            today,
            convention: WeekStart::default(),
            locale: Locale::default(),
            ownership: None,
            ownership_conflict: false,
            on_anchor_date_change: None,
            on_week_change: None,
            on_date_click: None,
            render_day_content: None,
            show_empty_days: true,
            empty_week_data: None,
            left_header: None,
            right_header: None,
        }
    }

    pub fn start_of_week(mut self, convention: WeekStart) -> Self {
        self.convention = convention;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Lets the strip own its anchor, starting from `date`
    pub fn initial_date(self, date: Date) -> Self {
        self.ownership(AnchorOwnership::Internal {
            initial: Some(date),
        })
    }

    /// Leaves the anchor with the host.  `on_anchor_date_change` receives
    /// every proposed anchor; the host applies it by calling
    /// [`WeekStrip::set_anchor_date()`].
    pub fn controlled<F>(self, anchor: Date, on_anchor_date_change: F) -> Self
    where
        F: FnMut(Date) + 'static,
    {
        self.ownership(AnchorOwnership::External { anchor })
            .on_anchor_date_change(on_anchor_date_change)
    }

    /// Sets ownership directly.  Ownership may be chosen once, through this
    /// method, [`WeekStripBuilder::initial_date()`] or
    /// [`WeekStripBuilder::controlled()`]; choosing it again makes
    /// [`WeekStripBuilder::build()`] fail.  [`AnchorOwnership::External`]
    /// also requires [`WeekStripBuilder::on_anchor_date_change()`].
    pub fn ownership(mut self, ownership: AnchorOwnership) -> Self {
        if self.ownership.replace(ownership).is_some() {
            self.ownership_conflict = true;
        }
        self
    }

    pub fn on_anchor_date_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(Date) + 'static,
    {
        self.on_anchor_date_change = Some(Box::new(handler));
        self
    }

    pub fn on_week_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(WeekRange) + 'static,
    {
        self.on_week_change = Some(Box::new(handler));
        self
    }

    pub fn on_date_click<F>(mut self, handler: F) -> Self
    where
        F: FnMut(Date) + 'static,
    {
        self.on_date_click = Some(Box::new(handler));
        self
    }

    /// `source` returns `None` for days with nothing to show
    pub fn render_day_content<F>(mut self, source: F) -> Self
    where
        F: FnMut(Date) -> Option<C> + 'static,
    {
        self.render_day_content = Some(Box::new(source));
        self
    }

    pub fn show_empty_days(mut self, show: bool) -> Self {
        self.show_empty_days = show;
        self
    }

    pub fn empty_week_data(mut self, placeholder: C) -> Self {
        self.empty_week_data = Some(placeholder);
        self
    }

    pub fn left_header(mut self, content: C) -> Self {
        self.left_header = Some(content);
        self
    }

    pub fn right_header(mut self, content: C) -> Self {
        self.right_header = Some(content);
        self
    }

    /// Resolves the first week and reports it to the week-change handler.
    ///
    /// Fails if ownership was chosen more than once, if the anchor change
    /// handler does not match the ownership, or if the first week cannot be
    /// resolved.
    pub fn build(self) -> Result<WeekStrip<C>, AnchorError> {
        let WeekStripBuilder {
            today,
            convention,
            locale,
            ownership,
            ownership_conflict,
            on_anchor_date_change,
            on_week_change,
            on_date_click,
            mut render_day_content,
            show_empty_days,
            empty_week_data,
            left_header,
            right_header,
        } = self;
        if ownership_conflict {
            return Err(AnchorError::ConflictingOwnership);
        }
        let anchor = AnchorController::new(
            ownership.unwrap_or_default(),
            today,
            convention,
            on_anchor_date_change,
        )?;
        let resolved = resolve(anchor.anchor(), convention, render_day_content.as_mut())?;
        let mut notifier = WeekChangeNotifier::new(on_week_change);
        notifier.observe(resolved.range);
        Ok(WeekStrip {
            today,
            convention,
            locale,
            anchor,
            notifier,
            on_date_click,
            render_day_content,
            show_empty_days,
            empty_week_data,
            left_header,
            right_header,
            resolved,
        })
    }
}

impl<C: fmt::Debug> fmt::Debug for WeekStripBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeekStripBuilder")
            .field("today", &self.today)
            .field("convention", &self.convention)
            .field("locale", &self.locale)
            .field("ownership", &self.ownership)
            .field("ownership_conflict", &self.ownership_conflict)
            .field("show_empty_days", &self.show_empty_days)
            .field("empty_week_data", &self.empty_week_data)
            .field("left_header", &self.left_header)
            .field("right_header", &self.right_header)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;
    use time::macros::date;

    fn recorder<T: 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(T) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |x: T| sink.borrow_mut().push(x))
    }

    fn week(start: Date, convention: WeekStart) -> WeekRange {
        WeekRange::containing(start, convention).expect("week should resolve")
    }

    /// Content source that has something to say on the given dates only
    fn agenda(dates: &[Date]) -> impl FnMut(Date) -> Option<String> + 'static {
        let dates = dates.iter().copied().collect::<BTreeSet<_>>();
        move |d: Date| dates.contains(&d).then(|| format!("event on {d}"))
    }

    fn row_dates<C>(body: &WeekBody<'_, C>) -> Vec<Date> {
        match body {
            WeekBody::Rows(rows) => rows.iter().map(|slot| slot.date).collect(),
            WeekBody::Collapsed(_) => panic!("expected rows, got collapsed week"),
        }
    }

    #[test]
    fn test_resolve_sunday_first() {
        let strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .build()
            .expect("strip should build");
        assert_eq!(strip.range().start(), date!(2024 - 01 - 07));
        assert_eq!(strip.range().end(), date!(2024 - 01 - 13));
        assert_eq!(strip.anchor_date(), date!(2024 - 01 - 10));
        assert!(!strip.is_controlled());
    }

    #[test]
    fn test_resolve_monday_first() {
        let strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .start_of_week(WeekStart::Monday)
            .build()
            .expect("strip should build");
        assert_eq!(strip.range().start(), date!(2024 - 01 - 08));
        assert_eq!(strip.range().end(), date!(2024 - 01 - 14));
    }

    #[test]
    fn test_defaults_to_today() {
        let strip = WeekStrip::<String>::builder(date!(2025 - 01 - 22))
            .build()
            .expect("strip should build");
        assert_eq!(strip.anchor_date(), date!(2025 - 01 - 22));
        assert_eq!(strip.range().start(), date!(2025 - 01 - 19));
        assert_eq!(strip.start_of_week(), WeekStart::Sunday);
        assert!(strip.shows_empty_days());
    }

    #[test]
    fn test_build_reports_first_week() {
        let (changes, on_week_change) = recorder();
        let _strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        assert_eq!(
            *changes.borrow(),
            [week(date!(2024 - 01 - 07), WeekStart::Sunday)]
        );
    }

    #[test]
    fn test_navigate_next() {
        let (changes, on_week_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        changes.borrow_mut().clear();
        assert_eq!(strip.navigate(Direction::Next), Ok(()));
        assert_eq!(strip.anchor_date(), date!(2024 - 01 - 17));
        assert_eq!(strip.range().start(), date!(2024 - 01 - 14));
        assert_eq!(strip.range().end(), date!(2024 - 01 - 20));
        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].start(), date!(2024 - 01 - 14));
        assert_eq!(changes[0].end(), date!(2024 - 01 - 20));
    }

    #[test]
    fn test_navigate_round_trip() {
        for convention in [WeekStart::Sunday, WeekStart::Monday] {
            let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
                .initial_date(date!(2024 - 12 - 31))
                .start_of_week(convention)
                .build()
                .expect("strip should build");
            let before = strip.range();
            assert_eq!(strip.navigate(Direction::Next), Ok(()));
            assert_ne!(strip.range(), before);
            assert_eq!(strip.navigate(Direction::Prev), Ok(()));
            assert_eq!(strip.range(), before);
        }
    }

    #[test]
    fn test_navigate_across_dst() {
        // 2024-03-10 is the US spring-forward date and 2024-03-31 the EU one
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 03 - 06))
            .build()
            .expect("strip should build");
        let mut start = strip.range().start();
        for _ in 0..5 {
            assert_eq!(strip.navigate(Direction::Next), Ok(()));
            assert_eq!(strip.range().start(), start + time::Duration::days(7));
            assert_eq!(strip.range().start().weekday(), time::Weekday::Sunday);
            start = strip.range().start();
        }
    }

    #[test]
    fn test_navigate_out_of_time() {
        let (changes, on_week_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(9999 - 12 - 20))
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        let before = strip.range();
        changes.borrow_mut().clear();
        assert_eq!(
            strip.navigate(Direction::Next),
            Err(AnchorError::OutOfTime(OutOfTimeError))
        );
        assert_eq!(strip.range(), before);
        assert_eq!(strip.anchor_date(), date!(9999 - 12 - 20));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_jump_to_and_today() {
        let (changes, on_week_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2025 - 01 - 22))
            .initial_date(date!(2024 - 01 - 10))
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        assert_eq!(strip.jump_to(date!(2024 - 07 - 04)), Ok(()));
        assert_eq!(strip.range().start(), date!(2024 - 06 - 30));
        assert_eq!(strip.jump_to_today(), Ok(()));
        assert_eq!(strip.anchor_date(), date!(2025 - 01 - 22));
        assert_eq!(strip.range().start(), date!(2025 - 01 - 19));
        assert_eq!(changes.borrow().len(), 3);
    }

    #[test]
    fn test_controlled_navigation_proposes_only() {
        let (proposals, on_change) = recorder();
        let (changes, on_week_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .controlled(date!(2024 - 01 - 10), on_change)
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        assert!(strip.is_controlled());
        changes.borrow_mut().clear();
        assert_eq!(strip.navigate(Direction::Next), Ok(()));
        // The host has not answered yet, so nothing moves
        assert_eq!(strip.anchor_date(), date!(2024 - 01 - 10));
        assert_eq!(strip.range().start(), date!(2024 - 01 - 07));
        assert_eq!(*proposals.borrow(), [date!(2024 - 01 - 17)]);
        assert!(changes.borrow().is_empty());
        // The host accepts the proposal
        assert_eq!(strip.set_anchor_date(date!(2024 - 01 - 17)), Ok(()));
        assert_eq!(strip.range().start(), date!(2024 - 01 - 14));
        assert_eq!(
            *changes.borrow(),
            [week(date!(2024 - 01 - 14), WeekStart::Sunday)]
        );
    }

    #[test]
    fn test_controlled_same_week_does_not_notify() {
        let (changes, on_week_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .controlled(date!(2024 - 01 - 08), |_| ())
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        changes.borrow_mut().clear();
        assert_eq!(strip.set_anchor_date(date!(2024 - 01 - 10)), Ok(()));
        assert_eq!(strip.anchor_date(), date!(2024 - 01 - 10));
        assert_eq!(strip.range().start(), date!(2024 - 01 - 07));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_controlled_jump_to_today_proposes() {
        let (proposals, on_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2025 - 01 - 22))
            .controlled(date!(2024 - 01 - 10), on_change)
            .build()
            .expect("strip should build");
        assert_eq!(strip.jump_to_today(), Ok(()));
        assert_eq!(*proposals.borrow(), [date!(2025 - 01 - 22)]);
        assert_eq!(strip.anchor_date(), date!(2024 - 01 - 10));
    }

    #[test]
    fn test_controlled_without_handler() {
        let r = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .ownership(AnchorOwnership::External {
                anchor: date!(2024 - 01 - 10),
            })
            .build();
        assert_eq!(r.err(), Some(AnchorError::MissingHandler));
    }

    #[test]
    fn test_ownership_with_separate_handler() {
        let (proposals, on_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .on_anchor_date_change(on_change)
            .ownership(AnchorOwnership::External {
                anchor: date!(2024 - 01 - 10),
            })
            .build()
            .expect("strip should build");
        assert!(strip.is_controlled());
        assert_eq!(strip.navigate(Direction::Prev), Ok(()));
        assert_eq!(*proposals.borrow(), [date!(2024 - 01 - 03)]);
    }

    #[test]
    fn test_ownership_chosen_twice() {
        let (proposals, on_change) = recorder();
        let r = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .controlled(date!(2024 - 01 - 10), on_change)
            .initial_date(date!(2024 - 01 - 10))
            .build();
        assert_eq!(r.err(), Some(AnchorError::ConflictingOwnership));
        let r = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .controlled(date!(2024 - 01 - 10), |_| ())
            .build();
        assert_eq!(r.err(), Some(AnchorError::ConflictingOwnership));
        assert!(proposals.borrow().is_empty());
    }

    #[test]
    fn test_handler_on_uncontrolled_strip() {
        let r = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .on_anchor_date_change(|_| ())
            .build();
        assert_eq!(r.err(), Some(AnchorError::UnusedHandler));
    }

    #[test]
    fn test_controlled_out_of_time_matches_uncontrolled() {
        let (proposals, on_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .controlled(date!(9999 - 12 - 20), on_change)
            .build()
            .expect("strip should build");
        assert_eq!(
            strip.navigate(Direction::Next),
            Err(AnchorError::OutOfTime(OutOfTimeError))
        );
        assert_eq!(
            strip.jump_to(date!(9999 - 12 - 31)),
            Err(AnchorError::OutOfTime(OutOfTimeError))
        );
        assert!(proposals.borrow().is_empty());
        assert_eq!(strip.anchor_date(), date!(9999 - 12 - 20));
    }

    #[test]
    fn test_set_anchor_on_uncontrolled_strip() {
        let (changes, on_week_change) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        changes.borrow_mut().clear();
        assert_eq!(
            strip.set_anchor_date(date!(2024 - 05 - 05)),
            Err(AnchorError::Uncontrolled)
        );
        assert_eq!(strip.anchor_date(), date!(2024 - 01 - 10));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_content_queried_in_order() {
        let (queried, mut log) = recorder();
        let strip = WeekStrip::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .render_day_content(move |d: Date| {
                log(d);
                Some(d.day())
            })
            .build()
            .expect("strip should build");
        assert_eq!(*queried.borrow(), strip.days());
        let slots = strip.slots();
        assert_eq!(slots[0].content, SlotContent::Filled(7));
        assert_eq!(slots[6].content, SlotContent::Filled(13));
        assert!(!strip.is_week_empty());
    }

    #[test]
    fn test_empty_week_collapses() {
        let strip = WeekStrip::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .render_day_content(|_| None)
            .empty_week_data(String::from("Nothing this week"))
            .build()
            .expect("strip should build");
        assert!(strip.is_week_empty());
        assert_eq!(
            strip.body(),
            WeekBody::Collapsed(&String::from("Nothing this week"))
        );
    }

    #[test]
    fn test_empty_week_without_placeholder() {
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .render_day_content(|_| None)
            .build()
            .expect("strip should build");
        assert!(strip.is_week_empty());
        assert_eq!(row_dates(&strip.body()), strip.days());
        strip.set_show_empty_days(false);
        assert_eq!(strip.body(), WeekBody::Rows(Vec::new()));
    }

    #[test]
    fn test_hide_empty_days() {
        let (changes, on_week_change) = recorder();
        let mut strip = WeekStrip::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .render_day_content(agenda(&[
                date!(2024 - 01 - 12),
                date!(2024 - 01 - 08),
                date!(2024 - 01 - 13),
            ]))
            .empty_week_data(String::from("Nothing this week"))
            .show_empty_days(false)
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        changes.borrow_mut().clear();
        assert!(!strip.is_week_empty());
        assert_eq!(
            row_dates(&strip.body()),
            [
                date!(2024 - 01 - 08),
                date!(2024 - 01 - 12),
                date!(2024 - 01 - 13)
            ]
        );
        strip.set_show_empty_days(true);
        assert_eq!(row_dates(&strip.body()).len(), 7);
        strip.set_show_empty_days(false);
        assert_eq!(row_dates(&strip.body()).len(), 3);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_unsupplied_content_is_never_hidden() {
        let strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .show_empty_days(false)
            .empty_week_data(String::from("Nothing this week"))
            .build()
            .expect("strip should build");
        assert!(!strip.is_week_empty());
        assert!(strip
            .slots()
            .iter()
            .all(|slot| slot.content == SlotContent::Unsupplied));
        assert_eq!(row_dates(&strip.body()), strip.days());
    }

    #[test]
    fn test_refresh_requeries_without_notifying() {
        let busy = Rc::new(RefCell::new(BTreeSet::new()));
        let source = Rc::clone(&busy);
        let (changes, on_week_change) = recorder();
        let mut strip = WeekStrip::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .render_day_content(move |d: Date| source.borrow().contains(&d).then_some("busy"))
            .on_week_change(on_week_change)
            .build()
            .expect("strip should build");
        changes.borrow_mut().clear();
        assert!(strip.is_week_empty());
        busy.borrow_mut().insert(date!(2024 - 01 - 11));
        // Stale until the host asks for a refresh
        assert!(strip.is_week_empty());
        strip.refresh();
        assert!(!strip.is_week_empty());
        assert_eq!(strip.slots()[4].content, SlotContent::Filled("busy"));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_click_date() {
        let (clicks, on_date_click) = recorder();
        let mut strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .on_date_click(on_date_click)
            .build()
            .expect("strip should build");
        let column = strip.week_bar()[2];
        strip.click_date(column.date);
        assert_eq!(*clicks.borrow(), [date!(2024 - 01 - 09)]);
    }

    #[test]
    fn test_week_bar_sunday_first() {
        let strip = WeekStrip::<String>::builder(date!(2024 - 01 - 10))
            .build()
            .expect("strip should build");
        let bar = strip.week_bar();
        assert_eq!(bar[0].label, "Su");
        assert_eq!(bar[0].kind, ColumnKind::Sunday);
        assert_eq!(bar[6].label, "Sa");
        assert_eq!(bar[6].kind, ColumnKind::Saturday);
        assert!(bar[1..6].iter().all(|col| col.kind == ColumnKind::Weekday));
        let today = bar
            .iter()
            .filter(|col| col.is_today)
            .map(|col| col.date)
            .collect::<Vec<_>>();
        assert_eq!(today, [date!(2024 - 01 - 10)]);
    }

    #[test]
    fn test_week_bar_monday_first_korean() {
        let strip = WeekStrip::<String>::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 01 - 10))
            .start_of_week(WeekStart::Monday)
            .locale(Locale::Korean)
            .build()
            .expect("strip should build");
        let bar = strip.week_bar();
        assert_eq!(
            bar.map(|col| col.label),
            ["월", "화", "수", "목", "금", "토", "일"]
        );
        assert_eq!(bar[5].kind, ColumnKind::Saturday);
        assert_eq!(bar[6].kind, ColumnKind::Sunday);
        assert_eq!(bar[6].date, date!(2024 - 01 - 14));
        assert!(bar.iter().all(|col| !col.is_today));
    }

    #[test]
    fn test_header() {
        let strip = WeekStrip::builder(date!(2020 - 06 - 01))
            .initial_date(date!(2024 - 02 - 01))
            .left_header("left")
            .right_header("right")
            .build()
            .expect("strip should build");
        // Week of Sunday 2024-01-28 to Saturday 2024-02-03
        let header = strip.header();
        assert_eq!(header.title, "2024.01");
        assert_eq!(header.left, Some(&"left"));
        assert_eq!(header.right, Some(&"right"));
        assert_eq!(strip.full_label(date!(2024 - 02 - 01)), "2024.02.01 (Thu)");
    }
}
