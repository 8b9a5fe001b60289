//! A Rust library for parsing GEDCOM-style genealogical records and
//! answering two recurring questions about them: what may be disclosed to
//! a viewer at a given access level, and what is the best-known or
//! best-estimated value of a fact (date, place, name) when the explicit
//! record is absent, ambiguous or suppressed by privacy rules.

pub mod config;
pub mod dates;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod models;
pub mod names;
pub mod privacy;
pub mod record;
pub mod store;

// Re-export the most common types for easier use
// Core types
pub use config::{EngineConfig, KeepAliveRule};
pub use error::{GedkinError, Result};
pub use models::{AccessLevel, EventClass, Family, Person, Restriction, Sex};
pub use record::{Fact, FactTree};

// Dates and estimation
pub use dates::{DateInterval, DateQualifier, parse_date};
pub use estimate::{best_date, compare_by_birth, compare_by_death};

// Names
pub use names::{NameVariant, best_name, decompose};

// Graph and privacy
pub use graph::RelationshipCache;
pub use privacy::{FactScope, RedactedRecord, VisibilityEvaluator};

// Record store
pub use store::{MemoryStore, RecordStore};
