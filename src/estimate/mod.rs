//! Date range estimation by bounded propagation across relatives.
//!
//! When a person has no explicit birth or death date, a best-estimate
//! interval is derived from the dates of close relatives: each relative
//! contributes one lower-bound and one upper-bound candidate, shifted by a
//! plausibility offset (parents are at least 15 years older than their
//! children, spouses within 25 years of each other, and so on). The final
//! estimate is the midpoint of the tightest bounds, widened to a calendar
//! year and marked `Estimated`.
//!
//! Relatives contribute only their own explicit record dates - never a
//! value that is itself estimated - so propagation is a single
//! non-recursive pass and terminates on cyclic family graphs.

use crate::config::EngineConfig;
use crate::dates::{DateInterval, DateQualifier, midpoint, shift_years};
use crate::error::Result;
use crate::models::{EventClass, Person, Sex};
use crate::store::RecordStore;
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;

/// Best-known or best-estimated date interval for a person's birth or
/// death. Explicit record dates win; estimation is the fallback. Results
/// are cached on the person per event class.
///
/// # Errors
/// Only record-store transport failures propagate; missing relatives and
/// unparseable dates degrade to an unknown interval.
pub fn best_date(
    person: &Person,
    class: EventClass,
    store: &dyn RecordStore,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<DateInterval> {
    match class {
        EventClass::Birth => estimated_birth(person, store, config),
        EventClass::Death => estimated_death(person, store, config, today),
    }
}

/// Compare two persons by estimated birth date, unknown dates last
pub fn compare_by_birth(
    a: &Person,
    b: &Person,
    store: &dyn RecordStore,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<Ordering> {
    let da = best_date(a, EventClass::Birth, store, config, today)?;
    let db = best_date(b, EventClass::Birth, store, config, today)?;
    Ok(da.cmp_by_min(&db))
}

/// Compare two persons by estimated death date, unknown dates last
pub fn compare_by_death(
    a: &Person,
    b: &Person,
    store: &dyn RecordStore,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<Ordering> {
    let da = best_date(a, EventClass::Death, store, config, today)?;
    let db = best_date(b, EventClass::Death, store, config, today)?;
    Ok(da.cmp_by_min(&db))
}

fn estimated_birth(
    person: &Person,
    store: &dyn RecordStore,
    config: &EngineConfig,
) -> Result<DateInterval> {
    if let Some(cached) = person.estimated_birth.get() {
        return Ok(*cached);
    }

    let explicit = person.explicit_date(EventClass::Birth);
    let estimate = if explicit.is_known() {
        explicit
    } else {
        propagate_birth(person, store, config)?
    };

    let _ = person.estimated_birth.set(estimate);
    Ok(estimate)
}

fn estimated_death(
    person: &Person,
    store: &dyn RecordStore,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<DateInterval> {
    if let Some(cached) = person.estimated_death.get() {
        return Ok(*cached);
    }

    let explicit = person.explicit_date(EventClass::Death);
    let estimate = if explicit.is_known() {
        explicit
    } else {
        let birth = estimated_birth(person, store, config)?;
        match (birth.min, birth.max) {
            (Some(min), Some(max)) => {
                let candidate = DateInterval {
                    min: shift_years(min, config.max_alive_age_years),
                    max: shift_years(max, config.max_alive_age_years),
                    qualifier: DateQualifier::Estimated,
                };
                // Never claim a death that has not yet had time to happen
                if candidate.ends_before(today) {
                    candidate
                } else {
                    DateInterval::unknown()
                }
            }
            _ => DateInterval::unknown(),
        }
    };

    let _ = person.estimated_death.set(estimate);
    Ok(estimate)
}

/// One lower-bound and one upper-bound candidate per contributing relative.
/// All offsets are expressed in 365-day years on calendar days.
struct Candidates {
    lowers: Vec<NaiveDate>,
    uppers: Vec<NaiveDate>,
}

impl Candidates {
    fn new() -> Self {
        Self {
            lowers: Vec::new(),
            uppers: Vec::new(),
        }
    }

    /// Contribute `[date.max + lower_shift, date.min + upper_shift]` years
    fn add(&mut self, date: DateInterval, lower_shift: i32, upper_shift: i32) {
        if let Some(lower) = date.max.and_then(|max| shift_years(max, lower_shift)) {
            self.lowers.push(lower);
        }
        if let Some(upper) = date.min.and_then(|min| shift_years(min, upper_shift)) {
            self.uppers.push(upper);
        }
    }

    fn resolve(self) -> DateInterval {
        let (Some(&lower), Some(&upper)) = (self.lowers.iter().max(), self.uppers.iter().min())
        else {
            // No candidates at all: explicitly unknown, never a guess
            return DateInterval::unknown();
        };
        let year = midpoint(lower.min(upper), upper.max(lower)).year();
        DateInterval::estimated_year(year)
    }
}

fn propagate_birth(
    person: &Person,
    store: &dyn RecordStore,
    config: &EngineConfig,
) -> Result<DateInterval> {
    let max_age = config.max_alive_age_years;
    let mut candidates = Candidates::new();

    // Own death: born at most a full lifespan before it
    let death = person.explicit_date(EventClass::Death);
    if death.min.is_some() {
        if let Some(lower) = death.min.and_then(|min| shift_years(min, -max_age)) {
            candidates.lowers.push(lower);
        }
        if let Some(upper) = death.max {
            candidates.uppers.push(upper);
        }
    }

    // Parental families: marriage, parents and siblings
    for family_xref in person.child_family_xrefs() {
        let Some(family) = store.family(family_xref)? else {
            log::debug!("dangling family reference {family_xref} ignored in estimation");
            continue;
        };
        let marriage = family.marriage_date();
        if marriage.min.is_some() {
            candidates.add(marriage, -1, 30);
        }
        if let Some(father) = resolve_person(store, family.husband_xref())? {
            candidates.add(father.explicit_date(EventClass::Birth), 15, 65);
        }
        if let Some(mother) = resolve_person(store, family.wife_xref())? {
            candidates.add(mother.explicit_date(EventClass::Birth), 15, 45);
        }
        for child_xref in family.children_xrefs() {
            if child_xref == person.xref() {
                continue;
            }
            if let Some(sibling) = resolve_person(store, Some(child_xref))? {
                candidates.add(sibling.explicit_date(EventClass::Birth), -30, 30);
            }
        }
    }

    // Own marriages: spouse and children
    for family_xref in person.spouse_family_xrefs() {
        let Some(family) = store.family(family_xref)? else {
            log::debug!("dangling family reference {family_xref} ignored in estimation");
            continue;
        };
        let marriage = family.marriage_date();
        if marriage.min.is_some() {
            candidates.add(marriage, -45, -15);
        }
        if let Some(spouse) = resolve_person(store, family.spouse_of(person.xref()))? {
            candidates.add(spouse.explicit_date(EventClass::Birth), -25, 25);
        }
        // Mothers are assumed at most 45 years older than their children,
        // fathers at most 65
        let lower_shift = if person.sex() == Sex::Female { -45 } else { -65 };
        for child_xref in family.children_xrefs() {
            if let Some(child) = resolve_person(store, Some(child_xref))? {
                candidates.add(child.explicit_date(EventClass::Birth), lower_shift, -15);
            }
        }
    }

    Ok(candidates.resolve())
}

fn resolve_person(
    store: &dyn RecordStore,
    xref: Option<&str>,
) -> Result<Option<std::sync::Arc<Person>>> {
    match xref {
        Some(xref) => store.person(xref),
        None => Ok(None),
    }
}
