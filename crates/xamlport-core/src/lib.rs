//! Xamlport Core - migration engine for WPF XAML object models
//!
//! This crate rewrites a parsed WPF markup tree into Avalonia conventions:
//! a semantics-preserving, best-effort migration that transforms what it
//! can and clearly flags what it cannot. Parsing markup text into the tree
//! and serializing the mutated tree back out are external collaborators;
//! the engine works purely on the object model.
//!
//! # Main Components
//!
//! - **Syntax-tree model**: [`Document`], [`Element`], [`Property`], and
//!   [`MarkupExtension`] — pure data with traversal helpers
//! - **Type resolution**: the pluggable [`TypeResolver`] trait and the
//!   in-memory [`RegistryResolver`] reference implementation
//! - **Enrichment**: ordered passes attaching resolved types, resource
//!   links, and binding summaries to the tree
//! - **Transformation**: a priority-ordered, fault-isolated pipeline of
//!   independently pluggable [`Transformer`] modules
//! - **Diagnostics**: structured, severity-tagged findings with stable
//!   codes, collected across the whole run
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use xamlport_core::resolver::registry::{wpf_baseline, WPF_PRESENTATION_NS};
//! use xamlport_core::{migrate, Document, MigrationOptions};
//!
//! # fn main() -> xamlport_core::Result<()> {
//! // The external parser builds the tree; a tiny document by hand here.
//! let mut document = Document::new(Some("Main.xaml".to_string()));
//! let window = document.create_element("Window", WPF_PRESENTATION_NS);
//! document.set_root(window)?;
//! document.add_attribute(window, "Visibility", "Collapsed")?;
//!
//! let options = MigrationOptions::new(Arc::new(wpf_baseline()));
//! let report = migrate(&mut document, &options)?;
//!
//! assert!(report.success());
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod document;
pub mod error;
pub mod migration;
pub mod resolver;

// Re-export main types for convenience
pub use diagnostics::{
    codes, Diagnostic, DiagnosticCollector, Location, Severity, Statistics,
};
pub use document::{
    BindingDetail, Descendants, Document, Element, ElementId, ExtensionValue, MarkupExtension,
    MetadataBag, NodeState, Property, PropertyId, PropertyKind, PropertyValue,
    RelativeSourceExpr, RelativeSourceMode, SemanticDetail, TreeWalk,
};
pub use error::{Error, Result, TypeResolutionPolicy, UnresolvedType};
pub use migration::{
    migrate, migrate_with, ClassifierConfig, EnrichmentPipeline, MappingKind, MappingRepository,
    MigrationContext, MigrationMetadata, MigrationOptions, MigrationReport, MigrationRule,
    PropertyKindClassifier, PropertyRepresentation, RuleBridge, RuleTarget, SymbolMapping,
    Transformer, TransformerPipeline, ValueMap,
};
pub use resolver::{PropertyInfo, RegistryResolver, TypeInfo, TypeResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_policy_default() {
        assert_eq!(TypeResolutionPolicy::default(), TypeResolutionPolicy::Optional);
    }
}
