//! Text formatting functions for `unifi_restore`.
//!
//! Provides the plain text lines written to the audit trail:
//! - Collection switch notices
//! - Shell-equivalent import commands
//! - The end-of-run summary

use std::borrow::Cow;

use crate::config::ImportTarget;
use crate::format::ImportReport;

/// Characters that never need quoting in a POSIX shell word.
fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | ',' | '+' | '=')
}

/// Quote a value for display as a single POSIX shell word.
///
/// Safe values are returned unchanged; anything else is wrapped in single
/// quotes with embedded `'` written as `'\''`.
#[must_use]
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && value.chars().all(is_shell_safe) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
}

/// Format the shell command equivalent to importing `payload`.
///
/// Format: `echo '{payload}' | {tool} --host {host} --db {db} --collection {collection}`
#[must_use]
pub fn format_import_command(target: &ImportTarget, collection: &str, payload: &[u8]) -> String {
    let payload = String::from_utf8_lossy(payload);
    format!(
        "echo {} | {} --host {} --db {} --collection {}",
        shell_quote(&payload),
        shell_quote(&target.tool),
        shell_quote(&target.host),
        shell_quote(&target.db),
        shell_quote(collection),
    )
}

/// Format the notice printed when a selector switches collections.
#[must_use]
pub fn format_collection_notice(collection: &str) -> String {
    format!("running updates for {collection}")
}

/// Format the one-line run summary.
#[must_use]
pub fn format_summary(report: &ImportReport) -> String {
    let collections = report.collections.len();
    if report.dry_run {
        return format!(
            "dry run: {} record(s) in {collections} collection(s), nothing imported",
            report.records
        );
    }
    format!(
        "imported {} record(s) into {collections} collection(s), {} failed",
        report.imported, report.failed
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote_safe_value() {
        assert_eq!(shell_quote("localhost:27117"), "localhost:27117");
        assert_eq!(shell_quote("devices"), "devices");
    }

    #[test]
    fn test_shell_quote_json() {
        assert_eq!(shell_quote(r#"{"id":1}"#), r#"'{"id":1}'"#);
    }

    #[test]
    fn test_shell_quote_single_quote() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_shell_quote_empty() {
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_format_import_command() {
        let line = format_import_command(&ImportTarget::default(), "devices", br#"{"id":1}"#);
        assert_eq!(
            line,
            r#"echo '{"id":1}' | mongoimport --host localhost:27117 --db ace --collection devices"#
        );
    }

    #[test]
    fn test_format_import_command_without_collection() {
        let line = format_import_command(&ImportTarget::default(), "", b"{}");
        assert!(line.ends_with("--collection ''"));
    }

    #[test]
    fn test_format_collection_notice() {
        assert_eq!(format_collection_notice("event"), "running updates for event");
    }
}
