//! Record store interface and in-memory implementation.
//!
//! The engine never owns the person/family graph; it resolves weak
//! cross-references through a `RecordStore`. A missing record (`Ok(None)`)
//! is a dead-end edge that every algorithm tolerates; an `Err` is a
//! transport failure and aborts the request.

use crate::error::Result;
use crate::models::{Family, Person};
use crate::record::tokenize_line;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Lookup-by-identifier interface to the record repository
pub trait RecordStore {
    /// Fetch a person record, `Ok(None)` when the identifier is unknown
    fn person(&self, xref: &str) -> Result<Option<Arc<Person>>>;

    /// Fetch a family record, `Ok(None)` when the identifier is unknown
    fn family(&self, xref: &str) -> Result<Option<Arc<Family>>>;
}

/// A collection of persons and families held in memory, indexed by xref
#[derive(Debug, Default)]
pub struct MemoryStore {
    persons: FxHashMap<String, Arc<Person>>,
    families: FxHashMap<String, Arc<Family>>,
}

impl MemoryStore {
    /// Create a new empty `MemoryStore`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a multi-record text into a store. Records are delimited by
    /// level-0 lines; record types other than `INDI` and `FAM` are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut store = Self::new();
        let mut current: Vec<&str> = Vec::new();

        let mut flush = |lines: &[&str], store: &mut Self| {
            if lines.is_empty() {
                return;
            }
            let raw = lines.join("\n");
            match tokenize_line(lines[0]).map(|line| line.tag) {
                Some(tag) if tag == "INDI" => store.add_person(Person::parse(&raw)),
                Some(tag) if tag == "FAM" => store.add_family(Family::parse(&raw)),
                _ => log::debug!("ignoring record of unsupported type: {:?}", lines[0]),
            }
        };

        for line in text.lines() {
            if line.trim_start().starts_with("0 ") && !current.is_empty() {
                flush(&current, &mut store);
                current.clear();
            }
            if !line.trim().is_empty() {
                current.push(line);
            }
        }
        flush(&current, &mut store);
        store
    }

    /// Load a store from a record text file.
    ///
    /// # Errors
    /// Fails when the file cannot be read.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Add a person, replacing any previous record with the same xref.
    /// Replacement discards all of the old record's derived caches.
    pub fn add_person(&mut self, person: Person) {
        self.persons
            .insert(person.xref().to_string(), Arc::new(person));
    }

    /// Add a family, replacing any previous record with the same xref
    pub fn add_family(&mut self, family: Family) {
        self.families
            .insert(family.xref().to_string(), Arc::new(family));
    }

    /// Number of person records held
    #[must_use]
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    /// Number of family records held
    #[must_use]
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Iterate over all persons in the store
    pub fn persons(&self) -> impl Iterator<Item = &Arc<Person>> {
        self.persons.values()
    }
}

impl RecordStore for MemoryStore {
    fn person(&self, xref: &str) -> Result<Option<Arc<Person>>> {
        Ok(self.persons.get(xref).cloned())
    }

    fn family(&self, xref: &str) -> Result<Option<Arc<Family>>> {
        Ok(self.families.get(xref).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_records_on_level_zero_lines() {
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 SEX M\n\
             0 @I2@ INDI\n1 SEX F\n\
             0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n\
             0 @S1@ SOUR\n1 TITL ignored\n",
        );
        assert_eq!(store.person_count(), 2);
        assert_eq!(store.family_count(), 1);
        let family = store.family("F1").unwrap().unwrap();
        assert_eq!(family.husband_xref(), Some("I1"));
    }

    #[test]
    fn missing_records_are_ok_none() {
        let store = MemoryStore::new();
        assert!(store.person("I99").unwrap().is_none());
        assert!(store.family("F99").unwrap().is_none());
    }

    #[test]
    fn from_path_loads_a_record_file() {
        let path = std::env::temp_dir().join("gedkin_store_roundtrip.ged");
        std::fs::write(&path, "0 @I1@ INDI\n1 SEX M\n0 @F1@ FAM\n1 HUSB @I1@\n").unwrap();
        let store = MemoryStore::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(store.person_count(), 1);
        assert_eq!(store.family_count(), 1);

        assert!(MemoryStore::from_path(std::env::temp_dir().join("gedkin_no_such_file.ged")).is_err());
    }

    #[test]
    fn replacing_a_record_discards_its_derived_caches() {
        let mut store = MemoryStore::new();
        store.add_person(Person::parse("0 @I1@ INDI\n1 SEX M\n"));
        assert_eq!(
            store.person("I1").unwrap().unwrap().sex(),
            crate::models::Sex::Male
        );
        store.add_person(Person::parse("0 @I1@ INDI\n1 SEX F\n"));
        assert_eq!(
            store.person("I1").unwrap().unwrap().sex(),
            crate::models::Sex::Female
        );
    }
}
