use super::util::{add_days, WeekStart};
use super::weeks::{OutOfTimeError, WeekRange};
use std::fmt;
use thiserror::Error;
use time::Date;

pub(crate) type DateHandler = Box<dyn FnMut(Date)>;

pub(crate) type RangeHandler = Box<dyn FnMut(WeekRange)>;

/// Who holds the authoritative anchor date.  Chosen once, when the strip is
/// built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnchorOwnership {
    /// The strip keeps its own anchor, starting at `initial` (or today if
    /// `None`), and moves it itself when navigated.
    Internal { initial: Option<Date> },
    /// The host keeps the anchor.  Navigation only proposes a new anchor to
    /// the host, which must hand any accepted value back through
    /// `WeekStrip::set_anchor_date()`.
    External { anchor: Date },
}

impl Default for AnchorOwnership {
    fn default() -> AnchorOwnership {
        AnchorOwnership::Internal { initial: None }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn days(self) -> i64 {
        match self {
            Direction::Prev => -7,
            Direction::Next => 7,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum AnchorError {
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
    #[error("anchor date is owned by the week strip and cannot be set by the host")]
    Uncontrolled,
    #[error("anchor ownership was chosen more than once")]
    ConflictingOwnership,
    #[error("a host-owned anchor requires an anchor change handler")]
    MissingHandler,
    #[error("anchor change handler given for a strip that owns its anchor")]
    UnusedHandler,
}

/// What became of a proposed anchor
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Proposal {
    /// The controller owns the anchor; the caller should resolve the proposed
    /// date and then `store()` it.
    Keep(Date),
    /// The proposal was handed to the host.
    Delegated,
}

pub(crate) struct AnchorController {
    // In controlled mode, this is only a working copy of the last value the
    // host supplied.
    anchor: Date,
    convention: WeekStart,
    // Present exactly when the host owns the anchor
    on_anchor_date_change: Option<DateHandler>,
}

impl AnchorController {
    pub(crate) fn new(
        ownership: AnchorOwnership,
        today: Date,
        convention: WeekStart,
        on_anchor_date_change: Option<DateHandler>,
    ) -> Result<AnchorController, AnchorError> {
        let anchor = match (ownership, on_anchor_date_change.is_some()) {
            (AnchorOwnership::Internal { initial }, false) => initial.unwrap_or(today),
            (AnchorOwnership::External { anchor }, true) => anchor,
            (AnchorOwnership::Internal { .. }, true) => return Err(AnchorError::UnusedHandler),
            (AnchorOwnership::External { .. }, false) => return Err(AnchorError::MissingHandler),
        };
        Ok(AnchorController {
            anchor,
            convention,
            on_anchor_date_change,
        })
    }

    pub(crate) fn anchor(&self) -> Date {
        self.anchor
    }

    pub(crate) fn is_controlled(&self) -> bool {
        self.on_anchor_date_change.is_some()
    }

    /// Proposes the anchor one week before or after the current one
    pub(crate) fn navigate(&mut self, direction: Direction) -> Result<Proposal, OutOfTimeError> {
        let proposed = add_days(self.anchor, direction.days()).ok_or(OutOfTimeError)?;
        self.propose(proposed)
    }

    /// Fails without telling the host if the week of `proposed` cannot be
    /// resolved
    pub(crate) fn propose(&mut self, proposed: Date) -> Result<Proposal, OutOfTimeError> {
        WeekRange::containing(proposed, self.convention)?;
        match self.on_anchor_date_change.as_mut() {
            None => Ok(Proposal::Keep(proposed)),
            Some(handler) => {
                log::debug!("Proposing anchor date {proposed} to host");
                handler(proposed);
                Ok(Proposal::Delegated)
            }
        }
    }

    /// Records an anchor whose week has already been resolved
    pub(crate) fn store(&mut self, anchor: Date) {
        self.anchor = anchor;
    }

    /// Checks that the host is allowed to supply the anchor
    pub(crate) fn check_external(&self) -> Result<(), AnchorError> {
        if self.is_controlled() {
            Ok(())
        } else {
            log::warn!("Host tried to set the anchor date of a strip that owns its own anchor");
            Err(AnchorError::Uncontrolled)
        }
    }
}

impl fmt::Debug for AnchorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorController")
            .field("anchor", &self.anchor)
            .field("convention", &self.convention)
            .field(
                "on_anchor_date_change",
                &self.on_anchor_date_change.as_ref().map(|_| ".."),
            )
            .finish()
    }
}

/// Fires the week-change handler once for each change in the resolved range
pub(crate) struct WeekChangeNotifier {
    last: Option<WeekRange>,
    on_week_change: Option<RangeHandler>,
}

impl WeekChangeNotifier {
    pub(crate) fn new(on_week_change: Option<RangeHandler>) -> WeekChangeNotifier {
        WeekChangeNotifier {
            last: None,
            on_week_change,
        }
    }

    /// Returns `true` if `range` differs from the previously observed range
    pub(crate) fn observe(&mut self, range: WeekRange) -> bool {
        if self.last == Some(range) {
            return false;
        }
        self.last = Some(range);
        log::debug!("Visible week is now {range}");
        if let Some(handler) = self.on_week_change.as_mut() {
            handler(range);
        }
        true
    }
}

impl fmt::Debug for WeekChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeekChangeNotifier")
            .field("last", &self.last)
            .field("on_week_change", &self.on_week_change.as_ref().map(|_| ".."))
            .finish()
    }
}
