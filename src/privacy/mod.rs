//! Visibility evaluation: the layered disclosure policy.
//!
//! A disclosure query runs through four gates in order: an explicit
//! per-record override, the dead-people rule (tempered by the keep-alive
//! windows), the relationship gate for the active viewer at member level,
//! and the default minimum access level for living people's data. Denied
//! disclosure yields a redacted stub, never the raw private text.
//!
//! The evaluator is request-scoped: it borrows one immutable configuration
//! and one graph snapshot, and keeps its memo tables and the per-viewer
//! relationship cache to itself, so a shared snapshot is never written to.

pub mod living;

use crate::config::{EngineConfig, KeepAliveRule};
use crate::dates::DateInterval;
use crate::error::Result;
use crate::estimate;
use crate::graph::RelationshipCache;
use crate::models::{AccessLevel, EventClass, Family, Person, Sex};
use crate::names::{self, NameVariant};
use crate::store::RecordStore;
use chrono::{Datelike, NaiveDate};
use std::cell::RefCell;

/// Scope of a disclosure query: the whole record, or one tagged fact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactScope<'a> {
    /// The record as a whole
    All,
    /// One top-level fact, by tag
    Fact(&'a str),
}

/// A redacted record stub: what a denied viewer receives instead of the
/// raw private text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedRecord {
    /// Record identifier - always preserved
    pub xref: String,
    /// Display names when the name gate passes, else the private label
    pub names: Vec<String>,
    /// Constant placeholder; the real sex is never leaked
    pub sex: Sex,
    /// Family membership links retained by configuration
    pub family_links: Vec<FamilyLink>,
    /// Constant placeholder shown in place of all dates
    pub date_label: String,
}

/// One retained family membership edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyLink {
    /// `FAMC` (child of) or `FAMS` (spouse in)
    pub tag: String,
    /// Family cross-reference
    pub xref: String,
}

impl RedactedRecord {
    /// Render the stub back to record text
    #[must_use]
    pub fn to_record_text(&self) -> String {
        let mut text = format!("0 @{}@ INDI", self.xref);
        for name in &self.names {
            text.push_str(&format!("\n1 NAME {name}"));
        }
        for link in &self.family_links {
            text.push_str(&format!("\n1 {} @{}@", link.tag, link.xref));
        }
        text.push_str(&format!("\n1 SEX {}", self.sex));
        text
    }
}

/// Request-scoped disclosure and inference front-end
pub struct VisibilityEvaluator<'a> {
    store: &'a dyn RecordStore,
    config: &'a EngineConfig,
    today: NaiveDate,
    viewer: Option<String>,
    relationship: RefCell<Option<RelationshipCache>>,
    memo: RefCell<rustc_hash::FxHashMap<(String, AccessLevel), bool>>,
}

impl<'a> VisibilityEvaluator<'a> {
    /// Create an evaluator over one graph snapshot.
    ///
    /// # Errors
    /// Fails fast on invalid configuration, before any query runs.
    pub fn new(
        store: &'a dyn RecordStore,
        config: &'a EngineConfig,
        today: NaiveDate,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            today,
            viewer: None,
            relationship: RefCell::new(None),
            memo: RefCell::new(rustc_hash::FxHashMap::default()),
        })
    }

    /// Attach the active viewer for relationship-based disclosure. The
    /// relationship cache is keyed by this person; changing the viewer
    /// discards it.
    #[must_use]
    pub fn with_viewer(mut self, viewer_xref: &str) -> Self {
        self.viewer = Some(viewer_xref.to_string());
        self.relationship = RefCell::new(Some(RelationshipCache::new(viewer_xref)));
        self
    }

    /// Whether the person is determined dead (explicit fact, lifespan
    /// horizon, or relative-date heuristic)
    pub fn is_dead(&self, person: &Person) -> Result<bool> {
        living::is_dead(person, self.store, self.config, self.today)
    }

    /// Best-known or estimated date for the person's birth or death
    pub fn best_date(&self, person: &Person, class: EventClass) -> Result<DateInterval> {
        estimate::best_date(person, class, self.store, self.config, self.today)
    }

    /// The person's primary name (display and sort forms)
    pub fn best_name<'p>(&self, person: &'p Person) -> &'p NameVariant {
        names::best_name(person, self.config)
    }

    /// Whether the person's record may be disclosed at the given level
    pub fn can_show_person(&self, person: &Person, level: AccessLevel) -> Result<bool> {
        let key = (person.xref().to_string(), level);
        if let Some(&known) = self.memo.borrow().get(&key) {
            return Ok(known);
        }
        let allowed = self.evaluate(person, level)?;
        self.memo.borrow_mut().insert(key, allowed);
        Ok(allowed)
    }

    fn evaluate(&self, person: &Person, level: AccessLevel) -> Result<bool> {
        // Gate 1: an explicit restriction outranks every other rule,
        // in both directions
        if let Some(restriction) = person.restriction() {
            log::debug!(
                "{}: explicit restriction {restriction:?} decides disclosure",
                person.xref()
            );
            return Ok(restriction.permits(level));
        }

        // Gate 2: dead people are generally disclosable, unless a
        // keep-alive window forces living treatment
        if level >= self.config.show_dead_people
            && self.is_dead(person)?
            && !self.keep_alive(person)
        {
            return Ok(true);
        }

        // Gate 3: close relatives of the active viewer, at member level only
        if level == AccessLevel::Member {
            if let (Some(distance), Some(cache)) = (
                self.config.relationship_privacy,
                self.relationship.borrow_mut().as_mut(),
            ) {
                if cache.is_within_distance(self.store, person.xref(), distance)? {
                    return Ok(true);
                }
                // Outside the circle: fall through to the default rule
            }
        }

        // Gate 4: living people's private data needs the configured level
        Ok(level >= self.config.min_living_access)
    }

    /// Whether a keep-alive window forces treating this person as living.
    ///
    /// A window triggers when a fact of its event class is dated within
    /// the window of the present. Under `KeepAliveRule::AnyWindow` one
    /// triggering window suffices; under `BothWindows` every *configured*
    /// window must trigger.
    fn keep_alive(&self, person: &Person) -> bool {
        let current_year = self.today.year();
        let window_hit = |class: EventClass, years: Option<i32>| {
            years.map(|years| {
                person.event_dates(class).any(|date| {
                    date.min
                        .or(date.max)
                        .is_some_and(|day| day.year() + years > current_year)
                })
            })
        };
        let birth = window_hit(EventClass::Birth, self.config.keep_alive_years_birth);
        let death = window_hit(EventClass::Death, self.config.keep_alive_years_death);

        match self.config.keep_alive_rule {
            KeepAliveRule::AnyWindow => birth == Some(true) || death == Some(true),
            KeepAliveRule::BothWindows => {
                let configured: Vec<bool> = [birth, death].into_iter().flatten().collect();
                !configured.is_empty() && configured.into_iter().all(|hit| hit)
            }
        }
    }

    /// Whether the person's name alone may be shown. A deployment may show
    /// all names while hiding the rest of the record, so this gate is
    /// evaluated independently of the general one.
    pub fn can_show_name(&self, person: &Person, level: AccessLevel) -> Result<bool> {
        Ok(level >= self.config.show_living_names || self.can_show_person(person, level)?)
    }

    /// Whether a family record may be shown: its own restriction wins,
    /// else every resolvable member must be disclosable
    pub fn can_show_family(&self, family: &Family, level: AccessLevel) -> Result<bool> {
        if let Some(restriction) = family.restriction() {
            return Ok(restriction.permits(level));
        }
        for member_xref in family.member_xrefs() {
            if let Some(member) = self.store.person(member_xref)? {
                if !self.can_show_person(&member, level)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Disclosure decision for a record or one of its facts. A fact-level
    /// restriction outranks the record-level answer.
    pub fn can_disclose(
        &self,
        person: &Person,
        level: AccessLevel,
        scope: FactScope<'_>,
    ) -> Result<bool> {
        if let FactScope::Fact(tag) = scope {
            let tree = person.facts();
            for fact in tree.facts_with_tag(&[tag]) {
                if let Some(restriction) = tree
                    .sub_value(fact, "RESN")
                    .and_then(crate::models::Restriction::from_value)
                {
                    return Ok(restriction.permits(level));
                }
            }
        }
        self.can_show_person(person, level)
    }

    /// Produce the redacted stub for a person whose record may not be
    /// disclosed: identifier, names per the name gate, configured family
    /// links, constant placeholders for everything else
    pub fn redacted_view(&self, person: &Person, level: AccessLevel) -> Result<RedactedRecord> {
        let names = if self.can_show_name(person, level)? {
            names::person_names(person, self.config)
                .iter()
                .map(|variant| variant.display.clone())
                .collect()
        } else {
            vec![self.config.private_label.clone()]
        };

        let mut family_links = Vec::new();
        for fact in person.facts().facts_with_tag(&["FAMC", "FAMS"]) {
            let Some(family_xref) = fact.target_xref() else {
                continue;
            };
            let retain = if self.config.show_private_relationships {
                true
            } else {
                match self.store.family(family_xref)? {
                    Some(family) => self.can_show_family(&family, level)?,
                    None => false,
                }
            };
            if retain {
                family_links.push(FamilyLink {
                    tag: fact.tag.clone(),
                    xref: family_xref.to_string(),
                });
            }
        }

        Ok(RedactedRecord {
            xref: person.xref().to_string(),
            names,
            sex: Sex::Unknown,
            family_links,
            date_label: self.config.private_label.clone(),
        })
    }
}
