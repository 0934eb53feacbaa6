//! The migration engine
//!
//! `migrate` is the primary public API: it enriches a parsed document,
//! runs the transformer pipeline over it, and returns a report. The
//! document is mutated in place — the caller hands the same tree to the
//! serializer afterwards, together with the report's diagnostics.

pub mod classifier;
pub mod context;
pub mod enrichment;
pub mod mapping;
pub mod tokenizer;
pub mod transformer;
pub mod transformers;

pub use classifier::{
    Classification, ClassifierConfig, PropertyKindClassifier, PropertyRepresentation,
    PropertyTraits,
};
pub use context::MigrationContext;
pub use enrichment::EnrichmentPipeline;
pub use mapping::{MappingKind, MappingRepository, SymbolMapping, ValueMap};
pub use transformer::{
    priority, ElementTransformer, Elementwise, MigrationRule, PropertyTransformer, Propertywise,
    RuleBridge, RuleTarget, Transformer, TransformerPipeline,
};

use crate::diagnostics::{DiagnosticCollector, Statistics};
use crate::document::Document;
use crate::error::{Result, TypeResolutionPolicy};
use crate::resolver::TypeResolver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Configuration for one migration run
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    pub policy: TypeResolutionPolicy,
    pub resolver: Arc<dyn TypeResolver>,
    /// Production mapping tables; transformers fall back to their
    /// illustrative built-ins for symbols the repository does not cover
    pub mappings: Arc<MappingRepository>,
    /// Name sets for the styled-vs-direct classifier
    pub classifier: ClassifierConfig,
}

impl MigrationOptions {
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
        Self {
            policy: TypeResolutionPolicy::default(),
            resolver,
            mappings: Arc::new(MappingRepository::default()),
            classifier: ClassifierConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: TypeResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mappings(mut self, mappings: Arc<MappingRepository>) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }
}

/// Facts about one completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationMetadata {
    pub source_path: Option<String>,
    /// RFC 3339 completion timestamp
    pub timestamp: String,
    pub duration_ms: u64,
    pub policy: TypeResolutionPolicy,
}

/// What the engine hands back next to the mutated tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    pub diagnostics: DiagnosticCollector,
    pub statistics: Statistics,
    pub metadata: MigrationMetadata,
}

impl MigrationReport {
    /// Success means no Error-severity diagnostics; warnings never fail a
    /// run
    pub fn success(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Migrate one document with the default transformer catalog
///
/// # Errors
///
/// Fails only when the `Required` type-resolution policy raises — either
/// on the first unresolved type (`fail_fast`) or as one aggregate failure
/// listing every record. Everything else is reported through diagnostics;
/// judge the outcome with [`MigrationReport::success`].
pub fn migrate(document: &mut Document, options: &MigrationOptions) -> Result<MigrationReport> {
    let mut pipeline = TransformerPipeline::new();
    for transformer in transformers::default_transformers_with(PropertyKindClassifier::new(
        options.classifier.clone(),
    )) {
        pipeline.register_boxed(transformer);
    }
    migrate_with(document, options, &mut pipeline)
}

/// Migrate one document through a caller-assembled pipeline
///
/// The pipeline may mix catalog transformers, rule bridges, and caller
/// modules; ordering still follows `(priority, name)`.
pub fn migrate_with(
    document: &mut Document,
    options: &MigrationOptions,
    pipeline: &mut TransformerPipeline,
) -> Result<MigrationReport> {
    let start = Instant::now();
    let mut ctx = MigrationContext::new(options.policy.clone(), options.mappings.clone())
        .with_source_path(document.source_path.clone());

    log::debug!(
        "migrating {} under {} policy",
        document.source_path.as_deref().unwrap_or("<unnamed>"),
        options.policy
    );

    let enrichment = EnrichmentPipeline::new(options.resolver.clone());
    enrichment.run(document, &mut ctx)?;

    pipeline.run(document, &mut ctx);

    Ok(MigrationReport {
        diagnostics: ctx.diagnostics,
        statistics: ctx.statistics,
        metadata: MigrationMetadata {
            source_path: document.source_path.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_ms: start.elapsed().as_millis() as u64,
            policy: options.policy.clone(),
        },
    })
}
