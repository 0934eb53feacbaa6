//! Transformation pipeline orchestration
//!
//! Registered transformers run in `(priority, name)` order — fully
//! deterministic across runs on identical input, so diagnostic ordering is
//! reproducible. A transformer's fault is caught at the orchestrator,
//! converted to one Error diagnostic naming the module, and the run
//! continues: no transformer can abort the pipeline. Overall success is
//! judged by the caller as `error_count() == 0`, not by a return value.

use super::Transformer;
use crate::diagnostics::codes;
use crate::document::Document;
use crate::migration::context::MigrationContext;

/// Owns and runs the registered transformer set
#[derive(Default)]
pub struct TransformerPipeline {
    transformers: Vec<Box<dyn Transformer>>,
}

impl TransformerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transformer; order of registration is irrelevant
    pub fn register<T: Transformer + 'static>(&mut self, transformer: T) {
        self.transformers.push(Box::new(transformer));
    }

    pub fn register_boxed(&mut self, transformer: Box<dyn Transformer>) {
        self.transformers.push(transformer);
    }

    pub fn transformer_count(&self) -> usize {
        self.transformers.len()
    }

    /// Run every transformer against the document
    pub fn run(&mut self, document: &mut Document, ctx: &mut MigrationContext) {
        if document.root().is_none() {
            ctx.warn_empty_document("transformation");
            return;
        }

        self.transformers
            .sort_by(|a, b| (a.priority(), a.name()).cmp(&(b.priority(), b.name())));

        for transformer in &self.transformers {
            log::debug!(
                "running transformer '{}' (priority {})",
                transformer.name(),
                transformer.priority()
            );
            if let Err(error) = transformer.transform(document, ctx) {
                // Fault isolation: one error diagnostic, then keep going.
                log::warn!("transformer '{}' failed: {}", transformer.name(), error);
                ctx.error(
                    codes::TRANSFORMER_FAILED,
                    format!("transformer '{}' failed: {}", transformer.name(), error),
                    None,
                );
            }
        }
    }
}
