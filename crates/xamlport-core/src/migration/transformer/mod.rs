//! The pluggable transformer contract
//!
//! A transformer is an independently authored rewrite module with a unique
//! name and an execution priority. The whole-document [`Transformer`]
//! trait is the contract the pipeline runs; the granular
//! [`ElementTransformer`]/[`PropertyTransformer`] traits express the
//! common predicate/action shape, lifted to the document level by the
//! [`Elementwise`]/[`Propertywise`] adapters, which perform the uniform
//! root-plus-descendants walk.

pub mod pipeline;
pub mod rules;

pub use pipeline::TransformerPipeline;
pub use rules::{MigrationRule, RuleBridge, RuleTarget};

use crate::document::{Document, ElementId, PropertyId, TreeWalk};
use crate::error::Result;
use crate::migration::context::MigrationContext;

/// Conventional priority bands, mirroring dependency order
pub mod priority {
    pub const NAMESPACES: i32 = 10;
    pub const TYPES: i32 = 20;
    pub const PROPERTIES: i32 = 30;
    pub const LEGACY_RULES: i32 = 35;
    pub const BINDINGS: i32 = 40;
    pub const RESOURCES: i32 = 45;
    pub const STYLES: i32 = 50;
    pub const TEMPLATES: i32 = 55;
    pub const CONTROLS: i32 = 60;
}

/// An independently pluggable unit of the rewrite pipeline
pub trait Transformer {
    /// Unique name; ties in sorting and names fault diagnostics
    fn name(&self) -> &str;

    /// Execution priority; lower runs earlier
    fn priority(&self) -> i32;

    /// Rewrite the document in place
    fn transform(&self, document: &mut Document, ctx: &mut MigrationContext) -> Result<()>;
}

/// Element-granularity rewrite: a predicate and an action
pub trait ElementTransformer {
    fn name(&self) -> &str;
    fn priority(&self) -> i32;

    fn should_transform(
        &self,
        document: &Document,
        element: ElementId,
        ctx: &MigrationContext,
    ) -> bool;

    fn transform_element(
        &self,
        document: &mut Document,
        element: ElementId,
        ctx: &mut MigrationContext,
    ) -> Result<()>;
}

/// Property-granularity rewrite: a predicate and an action
pub trait PropertyTransformer {
    fn name(&self) -> &str;
    fn priority(&self) -> i32;

    fn should_transform(
        &self,
        document: &Document,
        property: PropertyId,
        ctx: &MigrationContext,
    ) -> bool;

    fn transform_property(
        &self,
        document: &mut Document,
        property: PropertyId,
        ctx: &mut MigrationContext,
    ) -> Result<()>;
}

/// Lifts an [`ElementTransformer`] to the document contract
pub struct Elementwise<T>(pub T);

impl<T: ElementTransformer> Transformer for Elementwise<T> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn priority(&self) -> i32 {
        self.0.priority()
    }

    fn transform(&self, document: &mut Document, ctx: &mut MigrationContext) -> Result<()> {
        let Some(root) = document.root() else {
            ctx.warn_empty_document(self.0.name());
            return Ok(());
        };
        let mut walk = TreeWalk::new(root);
        while let Some(id) = walk.next(document) {
            if self.0.should_transform(document, id, ctx) {
                self.0.transform_element(document, id, ctx)?;
            }
        }
        Ok(())
    }
}

/// Lifts a [`PropertyTransformer`] to the document contract
pub struct Propertywise<T>(pub T);

impl<T: PropertyTransformer> Transformer for Propertywise<T> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn priority(&self) -> i32 {
        self.0.priority()
    }

    fn transform(&self, document: &mut Document, ctx: &mut MigrationContext) -> Result<()> {
        let Some(root) = document.root() else {
            ctx.warn_empty_document(self.0.name());
            return Ok(());
        };
        let mut walk = TreeWalk::new(root);
        while let Some(id) = walk.next(document) {
            // Snapshot: the action may add properties to this element
            let property_ids: Vec<PropertyId> = document.element(id).properties().to_vec();
            for pid in property_ids {
                if self.0.should_transform(document, pid, ctx) {
                    self.0.transform_property(document, pid, ctx)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypeResolutionPolicy;
    use crate::migration::mapping::MappingRepository;
    use std::sync::Arc;

    struct RenameEverything;

    impl ElementTransformer for RenameEverything {
        fn name(&self) -> &str {
            "test-rename-everything"
        }
        fn priority(&self) -> i32 {
            priority::TYPES
        }
        fn should_transform(&self, document: &Document, element: ElementId, _: &MigrationContext) -> bool {
            document.element(element).type_name != "Renamed"
        }
        fn transform_element(
            &self,
            document: &mut Document,
            element: ElementId,
            ctx: &mut MigrationContext,
        ) -> Result<()> {
            document.element_mut(element).type_name = "Renamed".to_string();
            ctx.statistics.elements_transformed += 1;
            Ok(())
        }
    }

    fn context() -> MigrationContext {
        MigrationContext::new(
            TypeResolutionPolicy::Optional,
            Arc::new(MappingRepository::default()),
        )
    }

    #[test]
    fn test_elementwise_walks_whole_tree() {
        let mut doc = Document::new(None);
        let root = doc.create_element("Window", "wpf");
        doc.set_root(root).unwrap();
        let child = doc.create_element("Button", "wpf");
        doc.append_child(root, child).unwrap();

        let mut ctx = context();
        Elementwise(RenameEverything).transform(&mut doc, &mut ctx).unwrap();
        assert_eq!(doc.element(root).type_name, "Renamed");
        assert_eq!(doc.element(child).type_name, "Renamed");
        assert_eq!(ctx.statistics.elements_transformed, 2);
    }

    #[test]
    fn test_predicate_makes_rerun_a_noop() {
        let mut doc = Document::new(None);
        let root = doc.create_element("Window", "wpf");
        doc.set_root(root).unwrap();

        let mut ctx = context();
        let transformer = Elementwise(RenameEverything);
        transformer.transform(&mut doc, &mut ctx).unwrap();
        transformer.transform(&mut doc, &mut ctx).unwrap();
        // Second run matched nothing
        assert_eq!(ctx.statistics.elements_transformed, 1);
    }

    #[test]
    fn test_empty_document_warns_and_noops() {
        let mut doc = Document::new(None);
        let mut ctx = context();
        Elementwise(RenameEverything).transform(&mut doc, &mut ctx).unwrap();
        assert_eq!(ctx.diagnostics.warning_count(), 1);
    }
}
