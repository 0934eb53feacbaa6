//! Binding rewrite (priority 40)
//!
//! Re-encodes relative-source expressions: `TemplatedParent` bindings with
//! a plain path become `TemplateBinding` expressions, `FindAncestor`
//! ancestor types go through the type-mapping table, and `PreviousData`
//! (which Avalonia cannot express) is flagged unsupported. ElementName
//! bindings are compatible as-is and pass untouched.

use crate::diagnostics::{codes, Diagnostic, Severity};
use crate::document::extension::known;
use crate::document::{
    metadata_keys, Document, ExtensionValue, NodeState, PropertyId, RelativeSourceMode,
};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::migration::transformer::{priority, PropertyTransformer};

pub struct BindingTransformer;

impl BindingTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BindingTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// The relative-source mode of a binding, when one is declared
fn relative_source_mode(document: &Document, property: PropertyId) -> Option<RelativeSourceMode> {
    document
        .property(property)
        .try_as_extension()?
        .argument("RelativeSource")?
        .try_as_relative_source()
        .map(|rs| rs.mode.clone())
}

impl PropertyTransformer for BindingTransformer {
    fn name(&self) -> &str {
        "bindings"
    }

    fn priority(&self) -> i32 {
        priority::BINDINGS
    }

    fn should_transform(
        &self,
        document: &Document,
        property: PropertyId,
        _ctx: &MigrationContext,
    ) -> bool {
        let prop = document.property(property);
        if prop.metadata.has_flag(metadata_keys::UNSUPPORTED) {
            return false;
        }
        let Some(extension) = prop.try_as_extension() else {
            return false;
        };
        extension.is_binding() && relative_source_mode(document, property).is_some()
    }

    fn transform_property(
        &self,
        document: &mut Document,
        property: PropertyId,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        let Some(mode) = relative_source_mode(document, property) else {
            return Ok(());
        };
        let location = document.property(property).location;

        match mode {
            RelativeSourceMode::TemplatedParent => {
                // `{Binding Path=X, RelativeSource={RelativeSource
                // TemplatedParent}}` → `{TemplateBinding X}`
                let path = document
                    .property(property)
                    .try_as_extension()
                    .and_then(|ext| {
                        ext.first_positional()
                            .or_else(|| ext.argument("Path"))
                            .and_then(ExtensionValue::try_as_str)
                    })
                    .map(str::to_string);
                if let Some(path) = path {
                    let prop = document.property_mut(property);
                    if let Some(extension) = prop.try_as_extension_mut() {
                        extension.name = known::TEMPLATE_BINDING.to_string();
                        extension.remove_argument("RelativeSource");
                        extension.remove_argument("Path");
                        extension.positional = vec![ExtensionValue::String(path)];
                    }
                    prop.state = prop.state.advance(NodeState::Transformed);
                    ctx.statistics.increment_count("BindingsConvertedToTemplateBinding");
                }
            }
            RelativeSourceMode::FindAncestor { ancestor_type, .. } => {
                // Ancestor type names follow the element type table
                let mapped = ancestor_type.as_deref().and_then(|name| {
                    ctx.mappings
                        .type_mapping(name)
                        .filter(|m| !m.target_name.is_empty() && m.target_name != name)
                        .map(|m| m.target_name.clone())
                });
                if let Some(target) = mapped {
                    let prop = document.property_mut(property);
                    if let Some(rs) = prop
                        .try_as_extension_mut()
                        .and_then(|ext| ext.argument_mut("RelativeSource"))
                    {
                        if let ExtensionValue::RelativeSource(expr) = rs {
                            if let RelativeSourceMode::FindAncestor { ancestor_type, .. } =
                                &mut expr.mode
                            {
                                *ancestor_type = Some(target);
                            }
                        }
                    }
                    prop.state = prop.state.advance(NodeState::Transformed);
                    ctx.statistics.increment_count("AncestorTypesRemapped");
                }
            }
            RelativeSourceMode::PreviousData => {
                let message =
                    "RelativeSource PreviousData has no Avalonia equivalent; binding flagged";
                let prop = document.property_mut(property);
                prop.metadata.set_flag(metadata_keys::UNSUPPORTED);
                if let Some(extension) = prop.try_as_extension_mut() {
                    extension.diagnostics.push(Diagnostic::new(
                        Severity::Warning,
                        codes::UNSUPPORTED_BINDING,
                        message,
                    ));
                }
                ctx.warn(codes::UNSUPPORTED_BINDING, message, location);
            }
            RelativeSourceMode::SelfSource => {
                // `{Binding RelativeSource={RelativeSource Self}}` maps
                // directly; nothing to rewrite.
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        MarkupExtension, PropertyKind, PropertyValue, RelativeSourceExpr,
    };
    use crate::error::TypeResolutionPolicy;
    use crate::migration::mapping::{MappingRepository, SymbolMapping};
    use crate::migration::transformer::{Propertywise, Transformer};
    use std::sync::Arc;

    fn context() -> MigrationContext {
        MigrationContext::new(
            TypeResolutionPolicy::Optional,
            Arc::new(MappingRepository::default()),
        )
    }

    fn doc_with_binding(extension: MarkupExtension) -> (Document, PropertyId) {
        let mut doc = Document::new(None);
        let root = doc.create_element("TextBlock", "wpf");
        doc.set_root(root).unwrap();
        let pid = doc
            .add_property(root, "Text", PropertyKind::Attribute, PropertyValue::Extension(extension))
            .unwrap();
        (doc, pid)
    }

    fn run(doc: &mut Document, ctx: &mut MigrationContext) {
        Propertywise(BindingTransformer::new()).transform(doc, ctx).unwrap();
    }

    #[test]
    fn test_templated_parent_becomes_template_binding() {
        let binding = MarkupExtension::new(known::BINDING)
            .with_named("Path", ExtensionValue::String("Background".to_string()))
            .with_named(
                "RelativeSource",
                ExtensionValue::RelativeSource(RelativeSourceExpr::new(
                    RelativeSourceMode::TemplatedParent,
                )),
            );
        let (mut doc, pid) = doc_with_binding(binding);
        let mut ctx = context();
        run(&mut doc, &mut ctx);

        let extension = doc.property(pid).try_as_extension().unwrap();
        assert_eq!(extension.name, known::TEMPLATE_BINDING);
        assert_eq!(
            extension.first_positional().and_then(ExtensionValue::try_as_str),
            Some("Background")
        );
        assert!(extension.argument("RelativeSource").is_none());
        assert_eq!(ctx.statistics.count("BindingsConvertedToTemplateBinding"), 1);
    }

    #[test]
    fn test_find_ancestor_type_remapped() {
        let mut repo = MappingRepository::new();
        repo.add_type("ListView", SymbolMapping::name_only("ListBox"));
        let mut ctx = MigrationContext::new(TypeResolutionPolicy::Optional, Arc::new(repo));

        let binding = MarkupExtension::new(known::BINDING)
            .with_named("Path", ExtensionValue::String("DataContext".to_string()))
            .with_named(
                "RelativeSource",
                ExtensionValue::RelativeSource(RelativeSourceExpr::new(
                    RelativeSourceMode::FindAncestor {
                        ancestor_type: Some("ListView".to_string()),
                        ancestor_level: 1,
                    },
                )),
            );
        let (mut doc, pid) = doc_with_binding(binding);
        run(&mut doc, &mut ctx);

        let rs = doc
            .property(pid)
            .try_as_extension()
            .unwrap()
            .argument("RelativeSource")
            .unwrap()
            .try_as_relative_source()
            .unwrap();
        match &rs.mode {
            RelativeSourceMode::FindAncestor { ancestor_type, .. } => {
                assert_eq!(ancestor_type.as_deref(), Some("ListBox"));
            }
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn test_previous_data_flagged_unsupported() {
        let binding = MarkupExtension::new(known::BINDING).with_named(
            "RelativeSource",
            ExtensionValue::RelativeSource(RelativeSourceExpr::new(
                RelativeSourceMode::PreviousData,
            )),
        );
        let (mut doc, pid) = doc_with_binding(binding);
        let mut ctx = context();
        run(&mut doc, &mut ctx);

        assert!(doc.property(pid).metadata.has_flag(metadata_keys::UNSUPPORTED));
        assert_eq!(ctx.diagnostics.warning_count(), 1);
        assert_eq!(
            ctx.diagnostics.iter().next().unwrap().code,
            codes::UNSUPPORTED_BINDING
        );
        // The finding is also recorded locally on the expression
        let extension = doc.property(pid).try_as_extension().unwrap();
        assert_eq!(extension.diagnostics.len(), 1);
    }

    #[test]
    fn test_plain_binding_untouched() {
        let binding = MarkupExtension::new(known::BINDING)
            .with_positional(ExtensionValue::String("Title".to_string()));
        let (mut doc, pid) = doc_with_binding(binding.clone());
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        assert_eq!(doc.property(pid).try_as_extension(), Some(&binding));
        assert_eq!(ctx.diagnostics.len(), 0);
    }
}
