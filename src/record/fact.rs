//! Structured facts extracted from a raw record.
//!
//! A record's lines are reduced once, at load time, to a flat arena of
//! `Fact` values; a fact's sub-facts are all immediately following lines at
//! exactly one level deeper, referenced by arena index rather than owned.
//! Facts are never mutated after extraction - every derived layer (dates,
//! names, privacy) reads them through `FactTree` queries.

use crate::record::tokenizer::{pointer_xref, tokenize_line};
use smallvec::SmallVec;

/// One structured fact: tag, value, level, and sub-fact indices
#[derive(Debug, Clone)]
pub struct Fact {
    /// Fact tag (`NAME`, `BIRT`, `FAMC`, ...)
    pub tag: String,
    /// Fact value; may be empty
    pub value: String,
    /// Nesting level within the record (roots are level 1)
    pub level: u8,
    /// Arena indices of this fact's direct sub-facts
    pub children: SmallVec<[usize; 4]>,
}

impl Fact {
    /// The cross-reference this fact points at, for link facts
    /// such as `FAMC @F1@` or `HUSB @I2@`
    #[must_use]
    pub fn target_xref(&self) -> Option<&str> {
        pointer_xref(&self.value)
    }
}

/// The structured form of one raw record: header plus a fact arena
#[derive(Debug, Clone, Default)]
pub struct FactTree {
    xref: String,
    record_tag: String,
    facts: Vec<Fact>,
    roots: Vec<usize>,
}

impl FactTree {
    /// Reduce raw record text to structured facts.
    ///
    /// Parsing is recoverable per line: a line that fails to tokenize, or
    /// that skips a nesting level, is logged and excluded while the rest of
    /// the record is still extracted.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut tree = Self::default();
        // Stack of (level, arena index) for the current nesting path
        let mut stack: Vec<(u8, usize)> = Vec::new();

        for raw_line in raw.lines() {
            if raw_line.trim().is_empty() {
                continue;
            }
            let Some(line) = tokenize_line(raw_line) else {
                log::debug!("skipping malformed record line: {raw_line:?}");
                continue;
            };

            if line.level == 0 {
                tree.xref = line.xref.unwrap_or_default();
                tree.record_tag = line.tag;
                stack.clear();
                continue;
            }

            // Pop back to this line's parent level
            while stack.last().is_some_and(|&(level, _)| level >= line.level) {
                stack.pop();
            }
            let parent = match stack.last() {
                Some(&(level, index)) if level + 1 == line.level => Some(index),
                None if line.level == 1 => None,
                _ => {
                    log::debug!("skipping record line at unexpected level: {raw_line:?}");
                    continue;
                }
            };

            let index = tree.facts.len();
            tree.facts.push(Fact {
                tag: line.tag,
                value: line.value,
                level: line.level,
                children: SmallVec::new(),
            });
            match parent {
                Some(parent) => tree.facts[parent].children.push(index),
                None => tree.roots.push(index),
            }
            stack.push((line.level, index));
        }

        tree
    }

    /// Cross-reference identifier of the record
    #[must_use]
    pub fn xref(&self) -> &str {
        &self.xref
    }

    /// Record-level tag (`INDI` or `FAM`)
    #[must_use]
    pub fn record_tag(&self) -> &str {
        &self.record_tag
    }

    /// Fact at a given arena index
    #[must_use]
    pub fn fact(&self, index: usize) -> &Fact {
        &self.facts[index]
    }

    /// Top-level facts in record order
    pub fn roots(&self) -> impl Iterator<Item = &Fact> {
        self.roots.iter().map(|&index| &self.facts[index])
    }

    /// Top-level facts whose tag matches any of `tags`, in record order
    pub fn facts_with_tag<'a>(&'a self, tags: &'a [&str]) -> impl Iterator<Item = &'a Fact> {
        self.roots()
            .filter(move |fact| tags.contains(&fact.tag.as_str()))
    }

    /// First direct sub-fact of `fact` with the given tag
    #[must_use]
    pub fn sub_fact<'a>(&'a self, fact: &Fact, tag: &str) -> Option<&'a Fact> {
        fact.children
            .iter()
            .map(|&index| &self.facts[index])
            .find(|sub| sub.tag == tag)
    }

    /// Value of the first direct sub-fact with the given tag,
    /// if present and non-empty
    #[must_use]
    pub fn sub_value<'a>(&'a self, fact: &Fact, tag: &str) -> Option<&'a str> {
        self.sub_fact(fact, tag)
            .map(|sub| sub.value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// All direct sub-facts of `fact`, in record order
    pub fn sub_facts<'a>(&'a self, fact: &'a Fact) -> impl Iterator<Item = &'a Fact> {
        fact.children.iter().map(|&index| &self.facts[index])
    }

    /// `DATE` values attached to any top-level fact, in record order.
    /// Used by the living/dead heuristic, which considers every dated event.
    pub fn dated_values(&self) -> impl Iterator<Item = &str> {
        self.roots()
            .filter_map(|fact| self.sub_value(fact, "DATE"))
    }

    /// Whether the record contains no facts at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
