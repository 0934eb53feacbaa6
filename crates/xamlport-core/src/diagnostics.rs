//! Diagnostics and statistics for the migration engine
//!
//! Every enrichment pass and transformer reports findings through the
//! append-only [`DiagnosticCollector`] and counts work through
//! [`Statistics`]. Both travel inside the single `MigrationContext` value,
//! so there is exactly one writer at any instant. Diagnostic codes are
//! stable UPPER_SNAKE_CASE strings suitable for automated filtering at the
//! tooling boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// Should be reviewed; never fails a migration
    Warning,
    /// Migration is considered failed when any of these exist
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Stable diagnostic codes
///
/// Codes are part of the tooling contract: renaming one is a breaking
/// change. Each code is owned by the stage that emits it.
pub mod codes {
    /// Element type could not be resolved (type-resolution pass)
    pub const UNRESOLVED_TYPE: &str = "UNRESOLVED_TYPE";
    /// Property not found on the element's resolved type
    pub const UNRESOLVED_PROPERTY: &str = "UNRESOLVED_PROPERTY";
    /// Attached-property owner type could not be resolved
    pub const UNRESOLVED_ATTACHED_OWNER: &str = "UNRESOLVED_ATTACHED_OWNER";
    /// Resource key missing from the document's resource table
    pub const UNRESOLVED_RESOURCE: &str = "UNRESOLVED_RESOURCE";
    /// ElementName binding names no known element
    pub const UNRESOLVED_ELEMENT_NAME: &str = "UNRESOLVED_ELEMENT_NAME";
    /// Binding carries no path, element name, relative source, or source
    pub const EMPTY_BINDING: &str = "EMPTY_BINDING";
    /// Document has no root; the stage no-oped
    pub const EMPTY_DOCUMENT: &str = "EMPTY_DOCUMENT";
    /// Distinct source values collapsed onto one target value
    pub const LOSSY_VALUE_MAPPING: &str = "LOSSY_VALUE_MAPPING";
    /// Construct has no Avalonia equivalent; flagged, not removed
    pub const UNSUPPORTED_CONSTRUCT: &str = "UNSUPPORTED_CONSTRUCT";
    /// A transformer module faulted; the pipeline continued without it
    pub const TRANSFORMER_FAILED: &str = "TRANSFORMER_FAILED";
    /// Binding mode or relative-source form Avalonia cannot express
    pub const UNSUPPORTED_BINDING: &str = "UNSUPPORTED_BINDING";
    /// Style setter targets a direct-only property
    pub const SETTER_NOT_STYLEABLE: &str = "SETTER_NOT_STYLEABLE";
}

/// Source location inside the original markup file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A structured, severity-tagged finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable machine-readable code from [`codes`]
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Diagnostic {
    /// Create a diagnostic with no source attribution
    pub fn new(severity: Severity, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message: message.into(),
            file_path: None,
            line: None,
            column: None,
        }
    }

    /// Attach the source file path
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Attach a source location
    pub fn with_location(mut self, location: Location) -> Self {
        self.line = Some(location.line);
        self.column = Some(location.column);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.code, self.message)?;
        if let (Some(path), Some(line)) = (&self.file_path, self.line) {
            write!(f, " ({}:{})", path, line)?;
        }
        Ok(())
    }
}

/// Append-only ordered log of diagnostics
///
/// Ordering is part of the engine's determinism contract: two runs over the
/// same document with the same transformer set produce identical sequences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticCollector {
    items: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Append every diagnostic from another collector or list
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of Error-severity entries
    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Number of Warning-severity entries
    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Whether the migration should be treated as failed
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

impl IntoIterator for DiagnosticCollector {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Fixed counters plus an open label map for ad hoc transformer reporting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub elements_transformed: u64,
    pub properties_transformed: u64,
    pub namespaces_transformed: u64,
    pub warnings_generated: u64,
    /// Open string-keyed counters; BTreeMap keeps report output stable
    pub counters: BTreeMap<String, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump an ad hoc counter by one, creating it on first use
    pub fn increment_count(&mut self, label: &str) {
        *self.counters.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Read an ad hoc counter (zero when never incremented)
    pub fn count(&self, label: &str) -> u64 {
        self.counters.get(label).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_preserves_order() {
        let mut collector = DiagnosticCollector::new();
        collector.push(Diagnostic::new(Severity::Warning, codes::UNRESOLVED_TYPE, "first"));
        collector.push(Diagnostic::new(Severity::Error, codes::TRANSFORMER_FAILED, "second"));
        collector.push(Diagnostic::new(Severity::Info, codes::UNSUPPORTED_CONSTRUCT, "third"));

        let messages: Vec<&str> = collector.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_error_count_is_derived() {
        let mut collector = DiagnosticCollector::new();
        assert_eq!(collector.error_count(), 0);
        collector.push(Diagnostic::new(Severity::Warning, codes::EMPTY_BINDING, "w"));
        collector.push(Diagnostic::new(Severity::Error, codes::TRANSFORMER_FAILED, "e"));
        assert_eq!(collector.error_count(), 1);
        assert!(collector.has_errors());
    }

    #[test]
    fn test_statistics_open_counters() {
        let mut stats = Statistics::new();
        stats.increment_count("TriggersFlagged");
        stats.increment_count("TriggersFlagged");
        assert_eq!(stats.count("TriggersFlagged"), 2);
        assert_eq!(stats.count("NeverTouched"), 0);
    }

    #[test]
    fn test_diagnostic_serializes_without_empty_location() {
        let d = Diagnostic::new(Severity::Warning, codes::UNRESOLVED_RESOURCE, "missing 'AccentBrush'");
        let json = serde_json::to_value(&d).unwrap();
        assert!(json.get("line").is_none());
        assert_eq!(json["code"], "UNRESOLVED_RESOURCE");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
