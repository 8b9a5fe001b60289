//! Calendar-day intervals and date-string parsing.
//!
//! Every date in a record resolves to a `[min, max]` interval of calendar
//! days: an exact day is a one-day interval, a bare year spans the whole
//! year, `BEF`/`AFT` leave one side unbounded. A string that cannot be
//! resolved is simply absent (`None`) - an unparseable date is expected
//! genealogical input, never a failure.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Exactness qualifier attached to a date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateQualifier {
    /// An explicit calendar date at some precision
    Exact,
    /// Approximate (`ABT`/`CAL`)
    About,
    /// Before the given date (`BEF`)
    Before,
    /// After the given date (`AFT`)
    After,
    /// Between two dates (`BET ... AND ...`, `FROM ... TO ...`)
    Between,
    /// Derived by propagation from relatives, not from an explicit fact
    Estimated,
    /// No usable date
    Unknown,
}

/// A pair of calendar-day bounds plus an exactness qualifier.
///
/// Invariant: `min <= max` whenever both bounds are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    /// Earliest possible day, `None` if unbounded below
    pub min: Option<NaiveDate>,
    /// Latest possible day, `None` if unbounded above
    pub max: Option<NaiveDate>,
    /// How the interval was obtained
    pub qualifier: DateQualifier,
}

impl DateInterval {
    /// The absent interval: unbounded on both sides, qualifier `Unknown`
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            min: None,
            max: None,
            qualifier: DateQualifier::Unknown,
        }
    }

    /// An estimated interval spanning one whole calendar year
    #[must_use]
    pub fn estimated_year(year: i32) -> Self {
        Self {
            min: NaiveDate::from_ymd_opt(year, 1, 1),
            max: NaiveDate::from_ymd_opt(year, 12, 31),
            qualifier: DateQualifier::Estimated,
        }
    }

    /// Whether at least one bound is known
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Whether the interval came from an explicit record date
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.is_known() && self.qualifier != DateQualifier::Estimated
    }

    /// Whether the whole interval lies strictly before `day`
    #[must_use]
    pub fn ends_before(&self, day: NaiveDate) -> bool {
        self.max.is_some_and(|max| max < day)
    }

    /// Compare two intervals by their minimum day, unknown intervals last.
    /// Used for sorting people by (estimated) birth or death date.
    #[must_use]
    pub fn cmp_by_min(&self, other: &Self) -> std::cmp::Ordering {
        match (self.min, other.min) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    }
}

/// Shift a date by whole years, counted as 365 days each.
/// All plausibility offsets in the estimator use this year length.
#[must_use]
pub fn shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(365 * i64::from(years)))
}

/// Midpoint of two days, rounded down
#[must_use]
pub fn midpoint(a: NaiveDate, b: NaiveDate) -> NaiveDate {
    a + Duration::days((b - a).num_days() / 2)
}

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

fn month_number(token: &str) -> Option<u32> {
    let token = token.to_ascii_uppercase();
    MONTHS
        .iter()
        .position(|&month| month == token)
        .map(|index| index as u32 + 1)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next.map(|date| date - Duration::days(1))
}

/// Parse a calendar point at day, month or year precision into its
/// `[min, max]` day span
fn parse_point(text: &str) -> Option<(NaiveDate, NaiveDate)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [day, month, year] => {
            let day: u32 = day.parse().ok()?;
            let month = month_number(month)?;
            let year: i32 = year.parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some((date, date))
        }
        [month, year] => {
            let month = month_number(month)?;
            let year: i32 = year.parse().ok()?;
            let min = NaiveDate::from_ymd_opt(year, month, 1)?;
            let max = last_day_of_month(year, month)?;
            Some((min, max))
        }
        [year] => {
            let year: i32 = year.parse().ok()?;
            let min = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let max = NaiveDate::from_ymd_opt(year, 12, 31)?;
            Some((min, max))
        }
        _ => None,
    }
}

/// Parse a record date string into a calendar-day interval.
///
/// Recognized forms: `12 JAN 1900`, `JAN 1900`, `1900`, and the qualified
/// forms `ABT`/`CAL`/`EST`, `BEF`, `AFT`, `BET ... AND ...` and
/// `FROM ... TO ...`. Anything else yields `None`.
#[must_use]
pub fn parse_date(text: &str) -> Option<DateInterval> {
    let text = text.trim();
    let upper = text.to_ascii_uppercase();

    if let Some(rest) = upper.strip_prefix("BET ") {
        let (from, to) = rest.split_once(" AND ")?;
        return parse_range(from, to);
    }
    if let Some(rest) = upper.strip_prefix("FROM ") {
        let (from, to) = rest.split_once(" TO ")?;
        return parse_range(from, to);
    }
    if let Some(rest) = upper.strip_prefix("BEF ") {
        let (_, max) = parse_point(rest)?;
        return Some(DateInterval {
            min: None,
            max: Some(max),
            qualifier: DateQualifier::Before,
        });
    }
    if let Some(rest) = upper.strip_prefix("AFT ") {
        let (min, _) = parse_point(rest)?;
        return Some(DateInterval {
            min: Some(min),
            max: None,
            qualifier: DateQualifier::After,
        });
    }
    for (prefix, qualifier) in [
        ("ABT ", DateQualifier::About),
        ("CAL ", DateQualifier::About),
        ("EST ", DateQualifier::Estimated),
    ] {
        if let Some(rest) = upper.strip_prefix(prefix) {
            let (min, max) = parse_point(rest)?;
            return Some(DateInterval {
                min: Some(min),
                max: Some(max),
                qualifier,
            });
        }
    }

    let (min, max) = parse_point(&upper)?;
    Some(DateInterval {
        min: Some(min),
        max: Some(max),
        qualifier: DateQualifier::Exact,
    })
}

fn parse_range(from: &str, to: &str) -> Option<DateInterval> {
    let (min, _) = parse_point(from)?;
    let (_, max) = parse_point(to)?;
    if min > max {
        return None;
    }
    Some(DateInterval {
        min: Some(min),
        max: Some(max),
        qualifier: DateQualifier::Between,
    })
}
