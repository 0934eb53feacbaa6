//! Style rewrite (priority 50)
//!
//! Re-encodes `TargetType` values through the type table, flags WPF
//! trigger collections (no Avalonia equivalent; pseudo-class selectors
//! replace them, which is a human decision), and classifies every setter's
//! target property as styled or direct. A setter on a direct-only property
//! cannot work in an Avalonia style and is flagged for review.

use crate::diagnostics::codes;
use crate::document::extension::known;
use crate::document::{metadata_keys, Document, ElementId, ExtensionValue, PropertyValue};
use crate::error::Result;
use crate::migration::classifier::{PropertyKindClassifier, PropertyRepresentation, PropertyTraits};
use crate::migration::context::MigrationContext;
use crate::migration::transformer::{priority, ElementTransformer};

pub struct StyleTransformer {
    classifier: PropertyKindClassifier,
}

impl StyleTransformer {
    pub fn new(classifier: PropertyKindClassifier) -> Self {
        Self { classifier }
    }
}

impl Default for StyleTransformer {
    fn default() -> Self {
        Self::new(PropertyKindClassifier::default())
    }
}

/// Re-encode a `TargetType` property in place: `{x:Type Button}` flattens
/// to the plain (mapped) type name, plain strings go through the table.
pub(super) fn reencode_target_type(
    document: &mut Document,
    element: ElementId,
    ctx: &mut MigrationContext,
) -> Option<String> {
    let pid = document.find_property(element, "TargetType")?;

    let current = match document.property(pid).value() {
        PropertyValue::String(s) => s.clone(),
        PropertyValue::Extension(ext) if ext.name == known::TYPE => {
            match ext.first_positional() {
                Some(ExtensionValue::TypeRef(name)) | Some(ExtensionValue::String(name)) => {
                    name.clone()
                }
                _ => return None,
            }
        }
        _ => return None,
    };

    let mapped = ctx
        .mappings
        .type_mapping(&current)
        .filter(|m| !m.target_name.is_empty())
        .map(|m| m.target_name.clone())
        .unwrap_or_else(|| current.clone());

    let changed = !matches!(document.property(pid).value(),
        PropertyValue::String(s) if *s == mapped);
    if changed {
        document.property_mut(pid).set_string(mapped.clone());
        ctx.statistics.properties_transformed += 1;
    }
    Some(mapped)
}

/// Flag a trigger-collection property element as unsupported, once
pub(super) fn flag_triggers(
    document: &mut Document,
    element: ElementId,
    ctx: &mut MigrationContext,
    counter: &str,
) {
    let Some(pid) = document.find_property(element, "Triggers") else {
        return;
    };
    if document.property(pid).metadata.has_flag(metadata_keys::UNSUPPORTED) {
        return;
    }
    let location = document.property(pid).location;
    document
        .property_mut(pid)
        .metadata
        .set_flag(metadata_keys::UNSUPPORTED);
    ctx.warn(
        codes::UNSUPPORTED_CONSTRUCT,
        "trigger collections have no Avalonia equivalent; use selectors or pseudo-classes instead",
        location,
    );
    ctx.statistics.increment_count(counter);
}

impl StyleTransformer {
    /// Setter elements under a style: direct children plus the contents of
    /// an explicit `Setters` property element
    fn setters(&self, document: &Document, style: ElementId) -> Vec<ElementId> {
        document
            .subtree(style)
            .filter(|id| document.element(*id).type_name == "Setter")
            .collect()
    }

    fn classify_setter(
        &self,
        document: &mut Document,
        setter: ElementId,
        target_type: Option<&str>,
        ctx: &mut MigrationContext,
    ) {
        if document
            .element(setter)
            .metadata
            .contains(metadata_keys::REPRESENTATION)
        {
            return;
        }
        let Some(pid) = document.find_property(setter, "Property") else {
            return;
        };
        let Some(property_name) = document.property(pid).try_as_str().map(str::to_string) else {
            return;
        };
        let location = document.element(setter).location;

        // Member record from the symbol table when type resolution reached
        // the target type; absent info degrades to name-only heuristics.
        let member = target_type.and_then(|name| {
            document
                .symbols
                .resolved_type_by_name(name)
                .and_then(|t| t.property(&property_name))
                .cloned()
        });

        let traits = PropertyTraits {
            read_only: member.as_ref().map(|m| m.is_read_only()).unwrap_or(false),
            ..Default::default()
        };
        let classification = self.classifier.classify(&property_name, traits);

        document
            .element_mut(setter)
            .metadata
            .set(metadata_keys::REPRESENTATION, classification.representation.label());
        ctx.statistics.increment_count("SettersClassified");

        if classification.representation == PropertyRepresentation::Direct {
            ctx.warn(
                codes::SETTER_NOT_STYLEABLE,
                format!(
                    "'{}' classifies as a direct property ({} rule); Avalonia styles cannot set it",
                    property_name, classification.deciding_rule
                ),
                location,
            );
        }
    }
}

impl ElementTransformer for StyleTransformer {
    fn name(&self) -> &str {
        "styles"
    }

    fn priority(&self) -> i32 {
        priority::STYLES
    }

    fn should_transform(
        &self,
        document: &Document,
        element: ElementId,
        _ctx: &MigrationContext,
    ) -> bool {
        document.element(element).type_name == "Style"
    }

    fn transform_element(
        &self,
        document: &mut Document,
        element: ElementId,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        let target_type = reencode_target_type(document, element, ctx);
        flag_triggers(document, element, ctx, "StyleTriggersFlagged");
        for setter in self.setters(document, element) {
            self.classify_setter(document, setter, target_type.as_deref(), ctx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MarkupExtension, PropertyKind};
    use crate::error::TypeResolutionPolicy;
    use crate::migration::mapping::{MappingRepository, SymbolMapping};
    use crate::migration::transformer::{Elementwise, Transformer};
    use std::sync::Arc;

    fn context_with_types() -> MigrationContext {
        let mut repo = MappingRepository::new();
        repo.add_type("ListView", SymbolMapping::name_only("ListBox"));
        MigrationContext::new(TypeResolutionPolicy::Optional, Arc::new(repo))
    }

    fn style_document() -> (Document, ElementId) {
        let mut doc = Document::new(None);
        let root = doc.create_element("Window", "wpf");
        doc.set_root(root).unwrap();
        let style = doc.create_element("Style", "wpf");
        doc.append_child(root, style).unwrap();
        (doc, style)
    }

    fn run(doc: &mut Document, ctx: &mut MigrationContext) {
        Elementwise(StyleTransformer::default()).transform(doc, ctx).unwrap();
    }

    #[test]
    fn test_target_type_extension_flattened_and_mapped() {
        let (mut doc, style) = style_document();
        doc.add_property(
            style,
            "TargetType",
            PropertyKind::Attribute,
            PropertyValue::Extension(
                MarkupExtension::new(known::TYPE)
                    .with_positional(ExtensionValue::TypeRef("ListView".to_string())),
            ),
        )
        .unwrap();

        let mut ctx = context_with_types();
        run(&mut doc, &mut ctx);

        let pid = doc.find_property(style, "TargetType").unwrap();
        assert_eq!(doc.property(pid).as_str().unwrap(), "ListBox");
    }

    #[test]
    fn test_triggers_flagged_non_destructively() {
        let (mut doc, style) = style_document();
        let trigger_collection = doc.create_element("TriggerCollection", "wpf");
        let trigger = doc.create_element("Trigger", "wpf");
        doc.append_child(trigger_collection, trigger).unwrap();
        let pid = doc
            .add_property(
                style,
                "Style.Triggers",
                PropertyKind::PropertyElement,
                PropertyValue::Element(trigger_collection),
            )
            .unwrap();

        let mut ctx = context_with_types();
        run(&mut doc, &mut ctx);

        assert!(doc.property(pid).metadata.has_flag(metadata_keys::UNSUPPORTED));
        // Non-destructive: the collection and its child survive
        assert_eq!(doc.property(pid).try_as_element(), Some(trigger_collection));
        assert_eq!(doc.element(trigger_collection).children().len(), 1);
        assert_eq!(ctx.diagnostics.warning_count(), 1);

        // Flagging is once-only
        run(&mut doc, &mut ctx);
        assert_eq!(ctx.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_setter_on_styled_property() {
        let (mut doc, style) = style_document();
        doc.add_attribute(style, "TargetType", "Button").unwrap();
        let setter = doc.create_element("Setter", "wpf");
        doc.add_attribute(setter, "Property", "Background").unwrap();
        doc.add_attribute(setter, "Value", "Red").unwrap();
        doc.append_child(style, setter).unwrap();

        let mut ctx = context_with_types();
        run(&mut doc, &mut ctx);

        assert_eq!(
            doc.element(setter).metadata.get::<String>(metadata_keys::REPRESENTATION),
            Some("styled".to_string())
        );
        assert_eq!(ctx.diagnostics.len(), 0);
    }

    #[test]
    fn test_setter_on_direct_property_warns() {
        use crate::resolver::registry::wpf_baseline;
        use crate::resolver::TypeResolver;

        let (mut doc, style) = style_document();
        doc.add_attribute(style, "TargetType", "Button").unwrap();
        let setter = doc.create_element("Setter", "wpf");
        doc.add_attribute(setter, "Property", "ActualWidth").unwrap();
        doc.append_child(style, setter).unwrap();

        // Make the Button type's members visible to the classifier
        let resolver = wpf_baseline();
        let button = resolver.resolve_full_name("System.Windows.Controls.Button").unwrap();
        doc.symbols.register_type(button);

        let mut ctx = context_with_types();
        run(&mut doc, &mut ctx);

        assert_eq!(
            doc.element(setter).metadata.get::<String>(metadata_keys::REPRESENTATION),
            Some("direct".to_string())
        );
        assert_eq!(ctx.diagnostics.warning_count(), 1);
        assert_eq!(
            ctx.diagnostics.iter().next().unwrap().code,
            codes::SETTER_NOT_STYLEABLE
        );
    }
}
