//! Migration context shared by every enrichment pass and transformer
//!
//! The context carries the diagnostic log, the statistics counters, the
//! active type-resolution policy, and the injected mapping repository.
//! Exactly one `&mut MigrationContext` exists per pipeline run, so there
//! is one writer at any instant by construction.

use crate::diagnostics::{codes, Diagnostic, DiagnosticCollector, Location, Severity, Statistics};
use crate::error::TypeResolutionPolicy;
use crate::migration::mapping::MappingRepository;
use std::collections::HashMap;
use std::sync::Arc;

/// State and services for one document's migration run
#[derive(Debug, Clone)]
pub struct MigrationContext {
    pub diagnostics: DiagnosticCollector,
    pub statistics: Statistics,
    pub policy: TypeResolutionPolicy,
    /// Injected symbol mapping tables
    pub mappings: Arc<MappingRepository>,
    /// Run-scoped sidecar data, keyed like node metadata bags
    pub metadata: HashMap<String, serde_json::Value>,
    /// Source file identifier, stamped onto every diagnostic
    pub source_path: Option<String>,
}

impl MigrationContext {
    pub fn new(policy: TypeResolutionPolicy, mappings: Arc<MappingRepository>) -> Self {
        Self {
            diagnostics: DiagnosticCollector::new(),
            statistics: Statistics::new(),
            policy,
            mappings,
            metadata: HashMap::new(),
            source_path: None,
        }
    }

    pub fn with_source_path(mut self, path: Option<String>) -> Self {
        self.source_path = path;
        self
    }

    /// Append an Info diagnostic
    pub fn info(&mut self, code: &str, message: impl Into<String>, location: Option<Location>) {
        self.push(Severity::Info, code, message, location);
    }

    /// Append a Warning diagnostic and bump the warning counter
    pub fn warn(&mut self, code: &str, message: impl Into<String>, location: Option<Location>) {
        self.statistics.warnings_generated += 1;
        self.push(Severity::Warning, code, message, location);
    }

    /// Append an Error diagnostic
    pub fn error(&mut self, code: &str, message: impl Into<String>, location: Option<Location>) {
        self.push(Severity::Error, code, message, location);
    }

    /// One Warning for an empty document, then the stage no-ops
    pub fn warn_empty_document(&mut self, stage: &str) {
        self.warn(
            codes::EMPTY_DOCUMENT,
            format!("document has no root element; {} skipped", stage),
            None,
        );
    }

    fn push(
        &mut self,
        severity: Severity,
        code: &str,
        message: impl Into<String>,
        location: Option<Location>,
    ) {
        let mut diagnostic = Diagnostic::new(severity, code, message);
        if let Some(path) = &self.source_path {
            diagnostic = diagnostic.with_file(path.clone());
        }
        if let Some(location) = location {
            diagnostic = diagnostic.with_location(location);
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn set_metadata(&mut self, key: &str, value: serde_json::Value) {
        self.metadata.insert(key.to_string(), value);
    }

    pub fn metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> MigrationContext {
        MigrationContext::new(
            TypeResolutionPolicy::Optional,
            Arc::new(MappingRepository::default()),
        )
        .with_source_path(Some("Main.xaml".to_string()))
    }

    #[test]
    fn test_warn_bumps_counter_and_stamps_file() {
        let mut ctx = test_context();
        ctx.warn(codes::UNRESOLVED_TYPE, "no such type", Some(Location::new(3, 7)));
        assert_eq!(ctx.statistics.warnings_generated, 1);
        let diagnostic = ctx.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.file_path.as_deref(), Some("Main.xaml"));
        assert_eq!(diagnostic.line, Some(3));
    }

    #[test]
    fn test_error_does_not_bump_warning_counter() {
        let mut ctx = test_context();
        ctx.error(codes::TRANSFORMER_FAILED, "boom", None);
        assert_eq!(ctx.statistics.warnings_generated, 0);
        assert!(ctx.diagnostics.has_errors());
    }

    #[test]
    fn test_run_metadata() {
        let mut ctx = test_context();
        ctx.set_metadata("pass.marker", serde_json::json!(1));
        assert_eq!(ctx.metadata("pass.marker"), Some(&serde_json::json!(1)));
        assert_eq!(ctx.metadata("absent"), None);
    }
}
