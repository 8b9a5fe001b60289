//! Line tokenizer for the tagged record format.
//!
//! Each line of a record declares a nesting level, an optional
//! cross-reference identifier, a tag, and an optional value:
//!
//! ```text
//! 0 @I1@ INDI
//! 1 NAME Robert /de Gliderow/
//! 2 GIVN Robert
//! ```
//!
//! Malformed lines are recoverable: the tokenizer reports them as `None`
//! and the caller skips them, so one bad line never aborts extraction of
//! the rest of the record.

/// One tokenized line: level, optional xref, tag, value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Nesting level declared at the start of the line
    pub level: u8,
    /// Cross-reference identifier, present on record headers (`0 @I1@ INDI`)
    pub xref: Option<String>,
    /// Record or fact tag (`INDI`, `NAME`, `DATE`, ...)
    pub tag: String,
    /// Remainder of the line after the tag; may be empty
    pub value: String,
}

/// Tokenize a single line, returning `None` for malformed input
#[must_use]
pub fn tokenize_line(line: &str) -> Option<Line> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut rest = line.trim_start();
    if rest.is_empty() {
        return None;
    }

    let (level_token, tail) = rest.split_once(' ')?;
    let level: u8 = level_token.parse().ok()?;
    rest = tail.trim_start();

    // An @xref@ may precede the tag on record headers
    let xref = if rest.starts_with('@') {
        let end = rest[1..].find('@')? + 1;
        let xref = rest[1..end].to_string();
        rest = rest[end + 1..].trim_start();
        Some(xref)
    } else {
        None
    };

    let (tag, value) = match rest.split_once(' ') {
        Some((tag, value)) => (tag, value),
        None => (rest, ""),
    };
    if tag.is_empty() {
        return None;
    }

    Some(Line {
        level,
        xref,
        tag: tag.to_string(),
        value: value.to_string(),
    })
}

/// Extract the cross-reference from a pointer value such as `@F1@`
#[must_use]
pub fn pointer_xref(value: &str) -> Option<&str> {
    let value = value.trim();
    value.strip_prefix('@')?.strip_suffix('@')
}
