//! Living or dead determination.
//!
//! If a person is not known to be dead they are assumed living - the
//! privacy-safe default. Death is established by an explicit death-class
//! fact, by any dated event older than the maximum plausible lifespan, or
//! failing those, by dated events of close relatives shifted by the same
//! generation-gap assumptions the date estimator uses.

use crate::config::EngineConfig;
use crate::dates::{self, shift_years};
use crate::error::Result;
use crate::models::Person;
use crate::store::RecordStore;
use chrono::NaiveDate;

/// Whether the person is determined dead.
///
/// # Errors
/// Only record-store transport failures propagate.
pub fn is_dead(
    person: &Person,
    store: &dyn RecordStore,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<bool> {
    let max_age = config.max_alive_age_years;

    // Explicit death-class fact: a bare `Y` value, or a date or place
    if person.has_explicit_death_fact() {
        return Ok(true);
    }

    // Any event older than the maximum lifespan means the person is dead
    let dated: Vec<_> = person
        .facts()
        .dated_values()
        .filter_map(dates::parse_date)
        .collect();
    if let Some(horizon) = shift_years(today, -max_age) {
        if dated.iter().any(|date| date.max.is_some_and(|max| max <= horizon)) {
            return Ok(true);
        }
    }
    // All dated events are recent; a dated birth among them means the
    // person must be alive
    if !dated.is_empty() && person.facts().facts_with_tag(&["BIRT"]).any(|fact| {
        person.facts().sub_value(fact, "DATE").is_some()
    }) {
        return Ok(false);
    }

    // No conclusive dates of their own: consult close relatives.
    // Parents are assumed no more than 45 years older than their children.
    for family_xref in person.child_family_xrefs() {
        let Some(family) = store.family(family_xref)? else {
            continue;
        };
        for parent_xref in family.spouse_xrefs() {
            if let Some(parent) = store.person(parent_xref)? {
                if record_dated_before(&parent, today, max_age + 45) {
                    return Ok(true);
                }
            }
        }
    }

    for family_xref in person.spouse_family_xrefs() {
        let Some(family) = store.family(family_xref)? else {
            continue;
        };
        // Marriage is assumed to occur after age 10
        if let Some(horizon) = shift_years(today, -(max_age - 10)) {
            if family
                .dated_values()
                .any(|date| date.max.is_some_and(|max| max <= horizon))
            {
                return Ok(true);
            }
        }
        // Spouses are assumed within 40 years of each other
        if let Some(spouse) = match family.spouse_of(person.xref()) {
            Some(xref) => store.person(xref)?,
            None => None,
        } {
            if record_dated_before(&spouse, today, max_age + 40) {
                return Ok(true);
            }
        }
        // Children are assumed born after age 15, grandchildren after 30
        for child_xref in family.children_xrefs() {
            let Some(child) = store.person(child_xref)? else {
                continue;
            };
            if record_dated_before(&child, today, max_age - 15) {
                return Ok(true);
            }
            for grandchild_family_xref in child.spouse_family_xrefs() {
                let Some(grandchild_family) = store.family(grandchild_family_xref)? else {
                    continue;
                };
                for grandchild_xref in grandchild_family.children_xrefs() {
                    if let Some(grandchild) = store.person(grandchild_xref)? {
                        if record_dated_before(&grandchild, today, max_age - 30) {
                            return Ok(true);
                        }
                    }
                }
            }
        }
    }

    Ok(false)
}

/// Whether any dated event on the record is at least `years` (365-day
/// years) before `today`
fn record_dated_before(person: &Person, today: NaiveDate, years: i32) -> bool {
    let Some(horizon) = shift_years(today, -years) else {
        return false;
    };
    person
        .facts()
        .dated_values()
        .filter_map(dates::parse_date)
        .any(|date| date.max.is_some_and(|max| max <= horizon))
}
