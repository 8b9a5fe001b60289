//! Domain models for the genealogical graph.
//!
//! The two node types are `Person` and `Family`; both hold immutable
//! extracted facts plus lazily derived caches. Cross-references between
//! them are weak string identifiers resolved through the record store.

pub mod family;
pub mod person;
pub mod types;

pub use family::Family;
pub use person::Person;
pub use types::{AccessLevel, EventClass, Restriction, Sex};
