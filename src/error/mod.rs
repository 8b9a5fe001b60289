//! Error handling for the gedkin engine.
//!
//! Only two classes of failure are fatal: invalid configuration (rejected at
//! startup) and record-store transport failures. Malformed fact lines,
//! unparseable dates and dangling cross-references are absorbed where they
//! occur and degrade to "unknown" results, since incomplete genealogical
//! data is an expected input, not an error.

use thiserror::Error;

/// Specialized error type for the gedkin engine
#[derive(Debug, Error)]
pub enum GedkinError {
    /// A required configuration value is missing or degenerate
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The record store could not serve a lookup (transport failure,
    /// not a missing record)
    #[error("record store failure for {xref}: {message}")]
    Store {
        /// Cross-reference identifier that was being resolved
        xref: String,
        /// Store-provided description of the failure
        message: String,
    },
    /// Error reading record text from a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gedkin operations
pub type Result<T> = std::result::Result<T, GedkinError>;
