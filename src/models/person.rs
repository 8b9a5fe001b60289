//! Person entity model.
//!
//! A `Person` owns the structured facts of one individual record plus a set
//! of lazily computed caches (sex, explicit dates, estimated dates, name
//! variants). The raw facts are immutable for the lifetime of the object,
//! so every cache is a once-computed cell; reloading the record means
//! building a fresh `Person`, which discards all derived values as a unit.

use crate::dates::{self, DateInterval};
use crate::error::Result;
use crate::models::types::{EventClass, Restriction, Sex};
use crate::names::NameVariant;
use crate::record::FactTree;
use crate::store::RecordStore;
use rustc_hash::FxHashSet;
use std::cell::OnceCell;
use std::sync::Arc;

/// A person in the genealogical graph
#[derive(Debug, Clone, Default)]
pub struct Person {
    facts: FactTree,
    sex: OnceCell<Sex>,
    birth_date: OnceCell<DateInterval>,
    death_date: OnceCell<DateInterval>,
    pub(crate) estimated_birth: OnceCell<DateInterval>,
    pub(crate) estimated_death: OnceCell<DateInterval>,
    pub(crate) names: OnceCell<Vec<NameVariant>>,
}

impl Person {
    /// Build a person from raw record text
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            facts: FactTree::parse(raw),
            ..Self::default()
        }
    }

    /// Build a person from an already extracted fact tree
    #[must_use]
    pub fn from_facts(facts: FactTree) -> Self {
        Self {
            facts,
            ..Self::default()
        }
    }

    /// Cross-reference identifier of this person
    #[must_use]
    pub fn xref(&self) -> &str {
        self.facts.xref()
    }

    /// The person's structured facts
    #[must_use]
    pub fn facts(&self) -> &FactTree {
        &self.facts
    }

    /// Recorded sex, `Unknown` when absent
    #[must_use]
    pub fn sex(&self) -> Sex {
        *self.sex.get_or_init(|| {
            self.facts
                .facts_with_tag(&["SEX"])
                .next()
                .map_or(Sex::Unknown, |fact| Sex::from_value(&fact.value))
        })
    }

    /// Record-level disclosure override, if any
    #[must_use]
    pub fn restriction(&self) -> Option<Restriction> {
        self.facts
            .facts_with_tag(&["RESN"])
            .find_map(|fact| Restriction::from_value(&fact.value))
    }

    /// The first well-formed explicit date for an event class.
    ///
    /// Event tags are tried in preference order (`BIRT` before `CHR` before
    /// `BAPM`); within one tag, record order, first parseable date wins.
    /// Returns the unknown interval when no fact of the class carries a
    /// usable date.
    #[must_use]
    pub fn explicit_date(&self, class: EventClass) -> DateInterval {
        let cell = match class {
            EventClass::Birth => &self.birth_date,
            EventClass::Death => &self.death_date,
        };
        *cell.get_or_init(|| {
            for tag in class.tags() {
                for fact in self.facts.facts_with_tag(&[tag]) {
                    if let Some(date) = self
                        .facts
                        .sub_value(fact, "DATE")
                        .and_then(dates::parse_date)
                    {
                        return date;
                    }
                }
            }
            DateInterval::unknown()
        })
    }

    /// The first non-empty place recorded for an event class
    #[must_use]
    pub fn best_place(&self, class: EventClass) -> Option<&str> {
        for tag in class.tags() {
            for fact in self.facts.facts_with_tag(&[tag]) {
                if let Some(place) = self.facts.sub_value(fact, "PLAC") {
                    return Some(place);
                }
            }
        }
        None
    }

    /// Whether the record carries an explicit death-class fact: either a
    /// bare `Y` value or a dated/placed event
    #[must_use]
    pub fn has_explicit_death_fact(&self) -> bool {
        self.facts
            .facts_with_tag(EventClass::Death.tags())
            .any(|fact| {
                fact.value.trim() == "Y"
                    || self.facts.sub_value(fact, "DATE").is_some()
                    || self.facts.sub_value(fact, "PLAC").is_some()
            })
    }

    /// All parseable dates attached to facts of an event class,
    /// in record order
    pub fn event_dates(&self, class: EventClass) -> impl Iterator<Item = DateInterval> {
        self.facts
            .facts_with_tag(class.tags())
            .filter_map(|fact| self.facts.sub_value(fact, "DATE"))
            .filter_map(dates::parse_date)
    }

    /// Family cross-references where this person is a spouse (`FAMS`)
    #[must_use]
    pub fn spouse_family_xrefs(&self) -> Vec<&str> {
        self.facts
            .facts_with_tag(&["FAMS"])
            .filter_map(|fact| fact.target_xref())
            .collect()
    }

    /// Family cross-references where this person is a child (`FAMC`)
    #[must_use]
    pub fn child_family_xrefs(&self) -> Vec<&str> {
        self.facts
            .facts_with_tag(&["FAMC"])
            .filter_map(|fact| fact.target_xref())
            .collect()
    }

    /// All family links, in record order. These are the person-to-union
    /// edges of the relationship graph.
    #[must_use]
    pub fn family_xrefs(&self) -> Vec<&str> {
        self.facts
            .facts_with_tag(&["FAMC", "FAMS"])
            .filter_map(|fact| fact.target_xref())
            .collect()
    }

    /// Explicit child count from an `NCHI` fact, if recorded
    #[must_use]
    pub fn recorded_child_count(&self) -> Option<u32> {
        self.facts
            .facts_with_tag(&["NCHI"])
            .find_map(|fact| fact.value.trim().parse().ok())
    }

    /// Number of children: an explicit `NCHI` fact wins, else the count of
    /// distinct children across all spouse families. A child listed in two
    /// unions is counted once.
    pub fn number_of_children(&self, store: &dyn RecordStore) -> Result<usize> {
        if let Some(recorded) = self.recorded_child_count() {
            return Ok(recorded as usize);
        }
        let mut children = FxHashSet::default();
        for family_xref in self.spouse_family_xrefs() {
            if let Some(family) = store.family(family_xref)? {
                for child_xref in family.children_xrefs() {
                    children.insert(child_xref.to_string());
                }
            }
        }
        Ok(children.len())
    }

    /// The current spouse: the partner from the last spouse family in
    /// record order. `None` when there is no spouse family, the family or
    /// partner record is missing, or this person is not listed as one of
    /// its spouses.
    pub fn current_spouse(&self, store: &dyn RecordStore) -> Result<Option<Arc<Person>>> {
        let Some(family_xref) = self.spouse_family_xrefs().last().copied() else {
            return Ok(None);
        };
        let Some(family) = store.family(family_xref)? else {
            return Ok(None);
        };
        match family.spouse_of(self.xref()) {
            Some(spouse_xref) => store.person(spouse_xref),
            None => Ok(None),
        }
    }

    /// The preferred parental family, chosen in order of preference:
    /// a family link flagged `_PRIMARY Y`, then one with `PEDI birth`,
    /// then one with no `PEDI` at all, then the first link
    #[must_use]
    pub fn primary_child_family_xref(&self) -> Option<&str> {
        let links: Vec<_> = self.facts.facts_with_tag(&["FAMC"]).collect();
        for link in &links {
            if self
                .facts
                .sub_value(link, "_PRIMARY")
                .is_some_and(|value| value.trim() == "Y")
            {
                return link.target_xref();
            }
        }
        for link in &links {
            if self
                .facts
                .sub_value(link, "PEDI")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("birth"))
            {
                return link.target_xref();
            }
        }
        for link in &links {
            if self.facts.sub_fact(link, "PEDI").is_none() {
                return link.target_xref();
            }
        }
        links.first().and_then(|link| link.target_xref())
    }
}
