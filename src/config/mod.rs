//! Configuration for the privacy and inference engine.
//!
//! One immutable `EngineConfig` value is threaded through every entry point
//! of the visibility evaluator and the date range estimator; nothing in the
//! engine reads ambient global state. The configuration is validated once
//! at startup and is read-only during request handling.

use crate::error::{GedkinError, Result};
use crate::models::types::AccessLevel;
use serde::{Deserialize, Serialize};

/// Precedence rule when the birth and death keep-alive windows disagree.
///
/// The engine treats a dead person as living ("keep alive") when recent
/// birth or death facts suggest close living relatives. Whether one
/// triggering window suffices, or both must trigger, is deployment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepAliveRule {
    /// Either window triggering forces living treatment
    AnyWindow,
    /// Both configured windows must trigger
    BothWindows,
}

/// Configuration for the gedkin engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum plausible lifespan in years; drives both death estimation
    /// and the "presumed dead" horizon for undated people
    pub max_alive_age_years: i32,
    /// Treat a person as living if a birth-class fact is dated within this
    /// many years of the present (None disables the window)
    pub keep_alive_years_birth: Option<i32>,
    /// Treat a person as living if a death-class fact is dated within this
    /// many years of the present (None disables the window)
    pub keep_alive_years_death: Option<i32>,
    /// How the two keep-alive windows combine when both are configured
    pub keep_alive_rule: KeepAliveRule,
    /// Minimum access level at which dead people are generally disclosable
    pub show_dead_people: AccessLevel,
    /// Minimum access level required to view living people's private data
    pub min_living_access: AccessLevel,
    /// Maximum person-hop distance for relationship-based disclosure at
    /// member level (None disables relationship privacy)
    pub relationship_privacy: Option<u32>,
    /// Minimum access level at which names of living people are shown
    /// even when the rest of the record is private
    pub show_living_names: AccessLevel,
    /// Keep family membership links in redacted records
    pub show_private_relationships: bool,
    /// Placeholder token for an unknown given name
    pub unknown_given_name: String,
    /// Placeholder token for an unknown surname
    pub unknown_surname: String,
    /// Placeholder shown in place of private names and dates
    pub private_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_alive_age_years: 120,
            keep_alive_years_birth: None,
            keep_alive_years_death: None,
            keep_alive_rule: KeepAliveRule::AnyWindow,
            show_dead_people: AccessLevel::Visitor,
            min_living_access: AccessLevel::Member,
            relationship_privacy: None,
            show_living_names: AccessLevel::Member,
            show_private_relationships: true,
            unknown_given_name: "Unknown".to_string(),
            unknown_surname: "N.N.".to_string(),
            private_label: "Private".to_string(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration, failing fast before any query runs.
    ///
    /// # Errors
    /// Returns `GedkinError::Configuration` for missing or degenerate values.
    pub fn validate(&self) -> Result<()> {
        if self.max_alive_age_years <= 0 {
            return Err(GedkinError::Configuration(
                "max_alive_age_years must be positive".to_string(),
            ));
        }
        if self.unknown_given_name.is_empty() || self.unknown_surname.is_empty() {
            return Err(GedkinError::Configuration(
                "unknown-name placeholders must be non-empty".to_string(),
            ));
        }
        if self.unknown_given_name == self.unknown_surname {
            return Err(GedkinError::Configuration(
                "given-name and surname placeholders must be distinct".to_string(),
            ));
        }
        if self.private_label.is_empty() {
            return Err(GedkinError::Configuration(
                "private_label must be non-empty".to_string(),
            ));
        }
        if self.relationship_privacy == Some(0) {
            return Err(GedkinError::Configuration(
                "relationship_privacy distance must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
