//! Semantic enrichment
//!
//! Enrichment attaches semantic information to an already-parsed tree
//! without ever changing its topology: resolved types, the symbol table,
//! resource links, and binding summaries. Passes run in a fixed order,
//! once per document, and every later transformer must keep working when
//! any of this information is absent.

mod bindings;
mod resources;
mod type_resolution;

use crate::document::{Document, NamedElementSymbol, ResourceSymbol, TreeWalk};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::resolver::TypeResolver;
use std::sync::Arc;

/// The ordered enrichment passes
#[derive(Debug)]
pub struct EnrichmentPipeline {
    resolver: Arc<dyn TypeResolver>,
}

impl EnrichmentPipeline {
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
        Self { resolver }
    }

    /// Run all passes: type resolution, then symbol-table construction,
    /// then resource resolution, then binding analysis.
    ///
    /// Only the Required type-resolution policy can make this fail; every
    /// other finding lands in the context's diagnostic log.
    pub fn run(&self, document: &mut Document, ctx: &mut MigrationContext) -> Result<()> {
        if document.root().is_none() {
            ctx.warn_empty_document("enrichment");
            return Ok(());
        }

        log::debug!(
            "enriching {} ({} elements)",
            document.source_path.as_deref().unwrap_or("<unnamed>"),
            document.element_count()
        );

        type_resolution::run(self.resolver.as_ref(), document, ctx)?;
        build_symbol_table(document);
        resources::run(document, ctx);
        bindings::run(document, ctx);
        Ok(())
    }
}

/// Rebuild the document's derived symbols wholesale from a full tree walk
///
/// Never patched incrementally: a later walk recomputes everything.
pub fn build_symbol_table(document: &mut Document) {
    document.symbols.clear_derived();

    let mut walk = TreeWalk::from_document(document);
    while let Some(id) = walk.next(document) {
        let element = document.element(id);
        let type_name = element.type_name.clone();
        let location = element.location;
        let name = element.name.clone();
        let resource_key = element.resource_key.clone();
        let resolved = element.resolved_type.clone();

        if let Some(name) = name {
            document.symbols.insert_named_element(NamedElementSymbol {
                name,
                element: id,
                type_name: type_name.clone(),
                location,
            });
        }
        if let Some(key) = resource_key {
            document.symbols.insert_resource(ResourceSymbol {
                key,
                element: id,
                type_name,
                location,
            });
        }
        if let Some(info) = resolved {
            document.symbols.register_type(info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PropertyKind, PropertyValue};
    use crate::error::TypeResolutionPolicy;
    use crate::migration::mapping::MappingRepository;
    use crate::resolver::registry::{wpf_baseline, WPF_PRESENTATION_NS};

    fn context() -> MigrationContext {
        MigrationContext::new(
            TypeResolutionPolicy::Optional,
            Arc::new(MappingRepository::default()),
        )
    }

    #[test]
    fn test_empty_document_warns_once_and_noops() {
        let mut doc = Document::new(None);
        let mut ctx = context();
        let pipeline = EnrichmentPipeline::new(Arc::new(wpf_baseline()));
        pipeline.run(&mut doc, &mut ctx).unwrap();
        assert_eq!(ctx.diagnostics.warning_count(), 1);
        assert!(!ctx.diagnostics.has_errors());
    }

    #[test]
    fn test_symbol_table_covers_property_element_subtrees() {
        let mut doc = Document::new(None);
        let window = doc.create_element("Window", WPF_PRESENTATION_NS);
        doc.set_root(window).unwrap();

        // A keyed brush inside Window.Resources and a named child
        let brush = doc.create_element("SolidColorBrush", WPF_PRESENTATION_NS);
        doc.element_mut(brush).resource_key = Some("AccentBrush".to_string());
        doc.add_property(
            window,
            "Window.Resources",
            PropertyKind::PropertyElement,
            PropertyValue::Element(brush),
        )
        .unwrap();

        let button = doc.create_element("Button", WPF_PRESENTATION_NS);
        doc.element_mut(button).name = Some("Accept".to_string());
        doc.append_child(window, button).unwrap();

        build_symbol_table(&mut doc);
        assert_eq!(doc.symbols.resource("AccentBrush").unwrap().element, brush);
        assert_eq!(doc.symbols.named_element("Accept").unwrap().type_name, "Button");

        // Wholesale rebuild drops stale entries
        doc.element_mut(button).name = None;
        build_symbol_table(&mut doc);
        assert!(doc.symbols.named_element("Accept").is_none());
    }
}
