//! Classification of dump lines.
//!
//! A UniFi autobackup dump interleaves collection selectors with the
//! documents that belong to them:
//!
//! ```text
//! {"__cmd":"select","collection":"device"}
//! {"_id":{"$oid":"..."},"mac":"..."}
//! {"__cmd":"select","collection":"event"}
//! ...
//! ```
//!
//! Selectors are recognized by their exact serialized shape. The dump writer
//! always emits them with this key order and no whitespace, so any other
//! shape is an ordinary document and is passed through as a record.

/// Serialized prefix shared by every selector line.
pub const SELECT_PREFIX: &[u8] = br#"{"__cmd":"select","collection":""#;

/// Serialized suffix closing a selector line.
pub const SELECT_SUFFIX: &[u8] = br#""}"#;

/// One line of a dump, borrowed from the scanner buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpLine<'a> {
    /// Switches the destination collection for the records that follow.
    Select(&'a str),
    /// An opaque document payload.
    Record(&'a [u8]),
}

impl<'a> DumpLine<'a> {
    /// Classify a line with its terminator already stripped.
    #[must_use]
    pub fn classify(line: &'a [u8]) -> Self {
        selected_collection(line).map_or(Self::Record(line), Self::Select)
    }
}

/// Extract the collection name from a selector line.
///
/// Returns `None` unless the line is exactly a selector: fixed prefix, a
/// UTF-8 name without quotes, and the fixed suffix.
#[must_use]
pub fn selected_collection(line: &[u8]) -> Option<&str> {
    let rest = line.strip_prefix(SELECT_PREFIX)?;
    let name = rest.strip_suffix(SELECT_SUFFIX)?;
    if name.contains(&b'"') {
        return None;
    }
    std::str::from_utf8(name).ok()
}
