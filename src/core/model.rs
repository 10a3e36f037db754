// LogPanel - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies (Atlas Layer Rule: this file uses std and serde only).
//
// `LogLine` and `LogPage` mirror the JSON contract of the log endpoint.

use serde::{Deserialize, Serialize};

// =============================================================================
// Severity
// =============================================================================

/// Normalised severity levels, ordered from most to least severe.
///
/// The endpoint sends level names as upper-case strings. `WARN` is accepted
/// as an alias of `WARNING`; anything unrecognised becomes `Unknown` rather
/// than failing the whole page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
    Unknown,
}

impl Severity {
    /// Levels offered by the level filter, in display order.
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ]
    }

    /// Wire/display label (`ERROR`, `WARNING`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Parse a level name case-insensitively.
    pub fn from_label(raw: &str) -> Severity {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "ERROR" => Severity::Error,
            "WARNING" | "WARN" => Severity::Warning,
            "INFO" => Severity::Info,
            "DEBUG" => Severity::Debug,
            _ => Severity::Unknown,
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        Severity::from_label(&raw)
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.label().to_string()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Log line (one table row, as sent by the endpoint)
// =============================================================================

/// A single formatted log entry as returned by the endpoint.
///
/// An entry may span several source lines (stack traces); `line_range` then
/// reads `"12-15"` and `is_multiline` is set. `content` is the display
/// preview; `full_content` carries the untruncated text when available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// First source line number of the entry.
    pub number: u64,

    /// Severity extracted by the server.
    pub level: Severity,

    /// `YYYY-MM-DD HH:MM:SS` when the server found one, otherwise empty.
    #[serde(default)]
    pub timestamp: String,

    /// Preview text shown in the message column.
    pub content: String,

    /// Full entry text (present for long or multi-line entries).
    #[serde(default)]
    pub full_content: Option<String>,

    /// The preview was shortened from the full content.
    #[serde(default)]
    pub is_long: bool,

    /// The entry spans more than one source line.
    #[serde(default)]
    pub is_multiline: bool,

    /// Number of source lines in the entry.
    #[serde(default = "default_line_count")]
    pub line_count: u32,

    /// Source line span, e.g. `"42"` or `"42-47"`.
    #[serde(default)]
    pub line_range: String,
}

fn default_line_count() -> u32 {
    1
}

impl LogLine {
    /// Whether the row offers a "View Full" action.
    pub fn has_full_view(&self) -> bool {
        self.is_long || self.is_multiline
    }

    /// Text shown in the detail window.
    pub fn full_text(&self) -> &str {
        self.full_content.as_deref().unwrap_or(&self.content)
    }

    /// Label for the line-number column.
    pub fn line_label(&self) -> String {
        if self.line_range.is_empty() {
            self.number.to_string()
        } else {
            self.line_range.clone()
        }
    }
}

// =============================================================================
// Log page (endpoint payload)
// =============================================================================

/// Response body of the log endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPage {
    /// Set when the endpoint could not serve the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Entries on the requested page, in file order.
    #[serde(default)]
    pub log_lines: Vec<LogLine>,

    /// Total entries in the file.
    #[serde(default)]
    pub total_lines: u64,

    /// 1-based index of the first entry on this page.
    #[serde(default)]
    pub start_line: u64,

    /// Index of the last entry on this page.
    #[serde(default)]
    pub end_line: u64,
}

// =============================================================================
// Fetch request / outcome (controller <-> fetch worker)
// =============================================================================

/// One request issued by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Monotonic sequence number used to discard out-of-order responses.
    pub seq: u64,

    /// 1-based page to request.
    pub page: u32,

    /// Whether the user asked for this refresh explicitly.
    pub manual: bool,
}

/// Result of one `FetchRequest`, sent back from the fetch worker.
#[derive(Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: Result<LogPage, crate::util::error::FetchError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserialises_endpoint_payload() {
        let json = r#"{
            "log_lines": [{
                "number": 3,
                "line_range": "3-5",
                "level": "ERROR",
                "timestamp": "2024-01-15 10:30:02",
                "content": "Traceback ... (+2 more lines)",
                "full_content": "Traceback\n  File x\nValueError",
                "is_multiline": true,
                "is_long": false,
                "line_count": 3,
                "raw": "ignored by the client"
            }],
            "total_lines": 40,
            "start_line": 1,
            "end_line": 25
        }"#;
        let page: LogPage = serde_json::from_str(json).unwrap();
        assert!(page.error.is_none());
        assert_eq!(page.total_lines, 40);
        let line = &page.log_lines[0];
        assert_eq!(line.level, Severity::Error);
        assert!(line.is_multiline);
        assert!(line.has_full_view());
        assert_eq!(line.line_label(), "3-5");
        assert_eq!(line.full_text(), "Traceback\n  File x\nValueError");
    }

    #[test]
    fn test_error_payload() {
        let page: LogPage = serde_json::from_str(r#"{"error": "Log file not found"}"#).unwrap();
        assert_eq!(page.error.as_deref(), Some("Log file not found"));
        assert!(page.log_lines.is_empty());
    }

    #[test]
    fn test_severity_aliases_and_unknown() {
        assert_eq!(Severity::from_label("warn"), Severity::Warning);
        assert_eq!(Severity::from_label("Critical"), Severity::Critical);
        assert_eq!(Severity::from_label("TRACE"), Severity::Unknown);
        let s: String = Severity::Warning.into();
        assert_eq!(s, "WARNING");
    }

    #[test]
    fn test_minimal_line_defaults() {
        let line: LogLine =
            serde_json::from_str(r#"{"number": 9, "level": "INFO", "content": "hi"}"#).unwrap();
        assert_eq!(line.line_count, 1);
        assert_eq!(line.line_label(), "9");
        assert!(!line.has_full_view());
        assert_eq!(line.full_text(), "hi");
    }
}
