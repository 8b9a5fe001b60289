//! Shared enumerations for the genealogical domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sex of a person as recorded on the `SEX` fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    /// Recorded male (`SEX M`)
    Male,
    /// Recorded female (`SEX F`)
    Female,
    /// Not recorded, or explicitly unknown (`SEX U`)
    Unknown,
}

impl Sex {
    /// Parse the value of a `SEX` fact
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value.trim() {
            "M" => Self::Male,
            "F" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "M"),
            Self::Female => write!(f, "F"),
            Self::Unknown => write!(f, "U"),
        }
    }
}

/// Class of life event used for date lookup and estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventClass {
    /// Birth-equivalent events: `BIRT`, `CHR`, `BAPM`
    Birth,
    /// Death-equivalent events: `DEAT`, `BURI`, `CREM`
    Death,
}

impl EventClass {
    /// Tags that count as evidence for this event class, in preference order
    #[must_use]
    pub const fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Birth => &["BIRT", "CHR", "BAPM"],
            Self::Death => &["DEAT", "BURI", "CREM"],
        }
    }
}

/// Ordered viewer privilege tier governing disclosure.
///
/// Higher variants carry strictly more privilege; every disclosure rule
/// except an explicit `RESN` override is monotonic in this ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AccessLevel {
    /// Anonymous visitor with no account
    Visitor,
    /// Authenticated member of the tree
    Member,
    /// Member with editing rights
    Editor,
    /// Tree manager
    Manager,
    /// Site administrator
    Administrator,
}

/// Explicit per-record or per-fact disclosure override (`RESN` tag).
///
/// `Restriction::None` grants disclosure to everyone, including levels the
/// general rules would deny; `Confidential` denies below `Manager` even for
/// records the general rules would show. This is the one sanctioned break
/// of privilege monotonicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Restriction {
    /// `RESN confidential` - managers and administrators only
    Confidential,
    /// `RESN privacy` - members and above
    Privacy,
    /// `RESN none` - always disclosed
    None,
}

impl Restriction {
    /// Parse the value of a `RESN` fact; unrecognized values
    /// (e.g. `locked`, which governs editing, not viewing) yield `None`
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "confidential" => Some(Self::Confidential),
            "privacy" => Some(Self::Privacy),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Whether this override permits disclosure at the given level
    #[must_use]
    pub fn permits(self, level: AccessLevel) -> bool {
        match self {
            Self::Confidential => level >= AccessLevel::Manager,
            Self::Privacy => level >= AccessLevel::Member,
            Self::None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_levels_are_ordered() {
        assert!(AccessLevel::Visitor < AccessLevel::Member);
        assert!(AccessLevel::Member < AccessLevel::Editor);
        assert!(AccessLevel::Editor < AccessLevel::Manager);
        assert!(AccessLevel::Manager < AccessLevel::Administrator);
    }

    #[test]
    fn restriction_parsing() {
        assert_eq!(
            Restriction::from_value("CONFIDENTIAL"),
            Some(Restriction::Confidential)
        );
        assert_eq!(Restriction::from_value("privacy"), Some(Restriction::Privacy));
        assert_eq!(Restriction::from_value("none"), Some(Restriction::None));
        assert_eq!(Restriction::from_value("locked"), None);
    }

    #[test]
    fn confidential_permits_managers_only() {
        assert!(!Restriction::Confidential.permits(AccessLevel::Editor));
        assert!(Restriction::Confidential.permits(AccessLevel::Manager));
        assert!(Restriction::None.permits(AccessLevel::Visitor));
    }
}
