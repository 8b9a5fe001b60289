//! Family (union) entity model.
//!
//! A family groups up to two spouses and an ordered list of children. All
//! member references are weak cross-references resolved through the record
//! store - persons and families form a cyclic graph and neither owns the
//! other.

use crate::dates::{self, DateInterval};
use crate::models::types::Restriction;
use crate::record::FactTree;
use std::cell::OnceCell;

/// A family unit in the genealogical graph
#[derive(Debug, Clone, Default)]
pub struct Family {
    facts: FactTree,
    marriage_date: OnceCell<DateInterval>,
}

impl Family {
    /// Build a family from raw record text
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            facts: FactTree::parse(raw),
            marriage_date: OnceCell::new(),
        }
    }

    /// Build a family from an already extracted fact tree
    #[must_use]
    pub fn from_facts(facts: FactTree) -> Self {
        Self {
            facts,
            marriage_date: OnceCell::new(),
        }
    }

    /// Cross-reference identifier of this family
    #[must_use]
    pub fn xref(&self) -> &str {
        self.facts.xref()
    }

    /// The family's structured facts
    #[must_use]
    pub fn facts(&self) -> &FactTree {
        &self.facts
    }

    /// Record-level disclosure override, if any
    #[must_use]
    pub fn restriction(&self) -> Option<Restriction> {
        self.facts
            .facts_with_tag(&["RESN"])
            .find_map(|fact| Restriction::from_value(&fact.value))
    }

    /// Husband's cross-reference, if present
    #[must_use]
    pub fn husband_xref(&self) -> Option<&str> {
        self.facts
            .facts_with_tag(&["HUSB"])
            .find_map(|fact| fact.target_xref())
    }

    /// Wife's cross-reference, if present
    #[must_use]
    pub fn wife_xref(&self) -> Option<&str> {
        self.facts
            .facts_with_tag(&["WIFE"])
            .find_map(|fact| fact.target_xref())
    }

    /// Both spouse cross-references, in record order
    #[must_use]
    pub fn spouse_xrefs(&self) -> Vec<&str> {
        self.facts
            .facts_with_tag(&["HUSB", "WIFE"])
            .filter_map(|fact| fact.target_xref())
            .collect()
    }

    /// Children cross-references, in record order
    #[must_use]
    pub fn children_xrefs(&self) -> Vec<&str> {
        self.facts
            .facts_with_tag(&["CHIL"])
            .filter_map(|fact| fact.target_xref())
            .collect()
    }

    /// All member cross-references - the union-to-person edges of the
    /// relationship graph
    #[must_use]
    pub fn member_xrefs(&self) -> Vec<&str> {
        self.facts
            .facts_with_tag(&["HUSB", "WIFE", "CHIL"])
            .filter_map(|fact| fact.target_xref())
            .collect()
    }

    /// The spouse of the given person within this family, if any
    #[must_use]
    pub fn spouse_of(&self, xref: &str) -> Option<&str> {
        let husband = self.husband_xref();
        let wife = self.wife_xref();
        if husband == Some(xref) {
            wife
        } else if wife == Some(xref) {
            husband
        } else {
            None
        }
    }

    /// The first well-formed explicit marriage date, cached
    #[must_use]
    pub fn marriage_date(&self) -> DateInterval {
        *self.marriage_date.get_or_init(|| {
            self.facts
                .facts_with_tag(&["MARR"])
                .filter_map(|fact| self.facts.sub_value(fact, "DATE"))
                .filter_map(dates::parse_date)
                .next()
                .unwrap_or_else(DateInterval::unknown)
        })
    }

    /// All parseable dates attached to any top-level fact of the family,
    /// in record order. The living/dead heuristic reads marriage and other
    /// family events through this.
    pub fn dated_values(&self) -> impl Iterator<Item = DateInterval> {
        self.facts.dated_values().filter_map(dates::parse_date)
    }
}
