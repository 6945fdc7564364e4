use time::Date;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub(crate) enum Phase {
    Normal,
    Full,
    New,
}

impl Phase {
    pub(crate) fn for_date(date: Date) -> Phase {
        // Will give wrong results pre-1900
        let year = date.year().abs_diff(1900);
        let goldn = (year % 19) + 1;
        let mut epact = (11 * goldn + 18) % 30;
        if (epact == 25 && goldn > 11) || epact == 24 {
            epact += 1;
        }
        let ordinal0 = u32::from(date.ordinal()) - 1;
        match (((((ordinal0 + epact) * 6) + 11) % 177) / 22) & 7 {
            0 => Phase::New,
            4 => Phase::Full,
            _ => Phase::Normal,
        }
    }
}

/// Per-day content for the strip: a note on days with a new or full moon,
/// nothing otherwise
pub(crate) fn moon_note(date: Date) -> Option<String> {
    match Phase::for_date(date) {
        Phase::Normal => None,
        Phase::Full => Some(String::from("Full moon: +1 Luck")),
        Phase::New => Some(String::from("New moon: beware of cockatrices")),
    }
}
