//! Property rename and value re-encoding (priority 30)
//!
//! The rename-plus-re-encode pattern: a name change paired with a value
//! map. When several distinct source values collapse onto one target value
//! the entry is marked lossy and the collapse emits exactly one warning —
//! `Hidden` and `Collapsed` both become `False`, but only `Hidden` loses a
//! distinction (WPF keeps the layout slot, Avalonia does not). Binding and
//! resource expressions pass through with only the name changed; `Removed`
//! records flag the property and leave it in place.

use crate::diagnostics::codes;
use crate::document::{metadata_keys, Document, NodeState, PropertyId};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::migration::mapping::{MappingKind, MappingRepository, SymbolMapping, ValueMap};
use crate::migration::transformer::{priority, PropertyTransformer};

/// Illustrative built-in table; injected repositories take precedence
fn builtin_mappings() -> MappingRepository {
    let mut repo = MappingRepository::new();
    repo.add_property(
        "Visibility",
        SymbolMapping::rename_with_values(
            "IsVisible",
            ValueMap::new()
                .with("Visible", "True")
                .with("Collapsed", "False")
                .with_lossy("Hidden", "False"),
        ),
    );
    // FrameworkElement.ToolTip becomes the attached ToolTip.Tip
    repo.add_property("ToolTip", SymbolMapping::name_only("ToolTip.Tip"));
    // Verified-compatible names
    repo.add_property("Margin", SymbolMapping::name_only("Margin"));
    repo.add_property("IsEnabled", SymbolMapping::name_only("IsEnabled"));
    // WPF focus-visual styling has no Avalonia counterpart
    repo.add_property("FocusVisualStyle", SymbolMapping::removed());
    // Event handler attributes follow the pointer-event renames
    repo.add_event("MouseLeftButtonDown", SymbolMapping::name_only("PointerPressed"));
    repo.add_event("MouseLeftButtonUp", SymbolMapping::name_only("PointerReleased"));
    repo.add_event("MouseEnter", SymbolMapping::name_only("PointerEntered"));
    repo.add_event("MouseLeave", SymbolMapping::name_only("PointerExited"));
    repo.add_event("Click", SymbolMapping::name_only("Click"));
    repo
}

pub struct PropertyRenameTransformer {
    builtin: MappingRepository,
}

impl PropertyRenameTransformer {
    pub fn new() -> Self {
        Self {
            builtin: builtin_mappings(),
        }
    }

    fn mapping_for<'a>(
        &'a self,
        ctx: &'a MigrationContext,
        document: &Document,
        property: PropertyId,
    ) -> Option<&'a SymbolMapping> {
        let prop = document.property(property);
        let owner_type = document.element(prop.owner()).type_name.clone();
        let key = prop.qualified_name();
        ctx.mappings
            .property_mapping(Some(&owner_type), &key)
            .or_else(|| self.builtin.property_mapping(Some(&owner_type), &key))
            // Handler attributes are written like properties; the event
            // table covers the names the member search cannot.
            .or_else(|| ctx.mappings.event_mapping(&key))
            .or_else(|| self.builtin.event_mapping(&key))
    }
}

impl Default for PropertyRenameTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTransformer for PropertyRenameTransformer {
    fn name(&self) -> &str {
        "property-renames"
    }

    fn priority(&self) -> i32 {
        priority::PROPERTIES
    }

    fn should_transform(
        &self,
        document: &Document,
        property: PropertyId,
        ctx: &MigrationContext,
    ) -> bool {
        let prop = document.property(property);
        if prop.metadata.has_flag(metadata_keys::REMOVED) {
            return false;
        }
        let Some(mapping) = self.mapping_for(ctx, document, property) else {
            return false;
        };
        !mapping.is_identity_for(&prop.qualified_name())
    }

    fn transform_property(
        &self,
        document: &mut Document,
        property: PropertyId,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        let Some(mapping) = self.mapping_for(ctx, document, property).cloned() else {
            return Ok(());
        };
        let source_name = document.property(property).qualified_name();
        let location = document.property(property).location;

        if mapping.kind == MappingKind::Removed {
            let prop = document.property_mut(property);
            prop.metadata.set_flag(metadata_keys::REMOVED);
            prop.metadata.set_flag(metadata_keys::UNSUPPORTED);
            ctx.warn(
                codes::UNSUPPORTED_CONSTRUCT,
                format!("property '{}' has no Avalonia equivalent; flagged for review", source_name),
                location,
            );
            ctx.statistics.increment_count("PropertiesFlaggedRemoved");
            return Ok(());
        }

        // Rename. A dotted target becomes an attached-property address.
        let renamed = mapping.target_name != source_name;
        if renamed {
            let prop = document.property_mut(property);
            prop.metadata.set(metadata_keys::ORIGINAL_NAME, source_name.as_str());
            match mapping.target_name.split_once('.') {
                Some((owner, local)) => {
                    prop.attached_owner = Some(owner.to_string());
                    prop.name = local.to_string();
                }
                None => {
                    prop.attached_owner = None;
                    prop.name = mapping.target_name.clone();
                }
            }
            prop.state = prop.state.advance(NodeState::Transformed);
        }

        // Re-encode plain string values; expressions pass through with
        // only the name changed.
        let string_value = document.property(property).try_as_str().map(str::to_string);
        if let Some(value) = string_value {
            match mapping.kind {
                MappingKind::NameAndValueChange => {
                    if let Some(entry) = mapping.value_map.as_ref().and_then(|m| m.map(&value)) {
                        let target_value = entry.target.clone();
                        let lossy = entry.lossy;
                        document.property_mut(property).set_string(target_value.clone());
                        if lossy {
                            ctx.warn(
                                codes::LOSSY_VALUE_MAPPING,
                                format!(
                                    "'{}'='{}' collapses to '{}'='{}'; the source distinction is lost",
                                    source_name, value, mapping.target_name, target_value
                                ),
                                location,
                            );
                        }
                    }
                }
                MappingKind::Custom => {
                    if let Some(converter) = mapping.converter {
                        if let Some(converted) = converter(&value) {
                            document.property_mut(property).set_string(converted);
                        }
                    }
                }
                _ => {}
            }
        }

        if renamed {
            ctx.statistics.properties_transformed += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ElementId, MarkupExtension, PropertyKind, PropertyValue};
    use crate::document::extension::known;
    use crate::error::TypeResolutionPolicy;
    use crate::migration::transformer::{Propertywise, Transformer};
    use std::sync::Arc;

    fn context() -> MigrationContext {
        MigrationContext::new(
            TypeResolutionPolicy::Optional,
            Arc::new(MappingRepository::default()),
        )
    }

    fn doc_with_attribute(name: &str, value: &str) -> (Document, ElementId, PropertyId) {
        let mut doc = Document::new(None);
        let root = doc.create_element("Button", "wpf");
        doc.set_root(root).unwrap();
        let pid = doc.add_attribute(root, name, value).unwrap();
        (doc, root, pid)
    }

    fn run(doc: &mut Document, ctx: &mut MigrationContext) {
        Propertywise(PropertyRenameTransformer::new())
            .transform(doc, ctx)
            .unwrap();
    }

    #[test]
    fn test_visible_becomes_true_without_warning() {
        let (mut doc, _, pid) = doc_with_attribute("Visibility", "Visible");
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        let prop = doc.property(pid);
        assert_eq!(prop.name, "IsVisible");
        assert_eq!(prop.as_str().unwrap(), "True");
        assert_eq!(ctx.diagnostics.len(), 0);
        assert_eq!(ctx.statistics.properties_transformed, 1);
    }

    #[test]
    fn test_collapsed_becomes_false_without_warning() {
        let (mut doc, _, pid) = doc_with_attribute("Visibility", "Collapsed");
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        assert_eq!(doc.property(pid).as_str().unwrap(), "False");
        assert_eq!(ctx.diagnostics.len(), 0);
    }

    #[test]
    fn test_hidden_becomes_false_with_one_lossy_warning() {
        let (mut doc, _, pid) = doc_with_attribute("Visibility", "Hidden");
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        assert_eq!(doc.property(pid).name, "IsVisible");
        assert_eq!(doc.property(pid).as_str().unwrap(), "False");
        assert_eq!(ctx.diagnostics.warning_count(), 1);
        let warning = ctx.diagnostics.iter().next().unwrap();
        assert_eq!(warning.code, codes::LOSSY_VALUE_MAPPING);
    }

    #[test]
    fn test_binding_value_passes_through_with_name_change_only() {
        let mut doc = Document::new(None);
        let root = doc.create_element("Button", "wpf");
        doc.set_root(root).unwrap();
        let binding = MarkupExtension::new(known::BINDING)
            .with_positional(crate::document::ExtensionValue::String("IsBusy".to_string()));
        let pid = doc
            .add_property(
                root,
                "Visibility",
                PropertyKind::Attribute,
                PropertyValue::Extension(binding.clone()),
            )
            .unwrap();

        let mut ctx = context();
        run(&mut doc, &mut ctx);

        let prop = doc.property(pid);
        assert_eq!(prop.name, "IsVisible");
        assert_eq!(prop.try_as_extension(), Some(&binding));
        assert_eq!(ctx.diagnostics.len(), 0);
    }

    #[test]
    fn test_dotted_target_becomes_attached_address() {
        let (mut doc, _, pid) = doc_with_attribute("ToolTip", "Saves the document");
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        let prop = doc.property(pid);
        assert_eq!(prop.attached_owner.as_deref(), Some("ToolTip"));
        assert_eq!(prop.name, "Tip");
        assert_eq!(prop.qualified_name(), "ToolTip.Tip");
    }

    #[test]
    fn test_same_name_mapping_is_noop() {
        let (mut doc, _, pid) = doc_with_attribute("Margin", "4,2");
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        assert_eq!(doc.property(pid).name, "Margin");
        assert_eq!(ctx.statistics.properties_transformed, 0);
    }

    #[test]
    fn test_removed_property_flagged_not_deleted() {
        let (mut doc, root, pid) = doc_with_attribute("FocusVisualStyle", "{x:Null}");
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        assert_eq!(doc.element(root).properties().len(), 1);
        assert!(doc.property(pid).metadata.has_flag(metadata_keys::REMOVED));
        assert_eq!(ctx.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let (mut doc, _, _) = doc_with_attribute("Visibility", "Hidden");
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        run(&mut doc, &mut ctx);
        // One rename, one lossy warning, no second pass effects
        assert_eq!(ctx.statistics.properties_transformed, 1);
        assert_eq!(ctx.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_event_attribute_renamed() {
        let (mut doc, _, pid) = doc_with_attribute("MouseLeftButtonDown", "OnPressed");
        let mut ctx = context();
        run(&mut doc, &mut ctx);
        let prop = doc.property(pid);
        assert_eq!(prop.name, "PointerPressed");
        // The handler name is not a value to re-encode
        assert_eq!(prop.as_str().unwrap(), "OnPressed");
    }

    #[test]
    fn test_qualified_injected_mapping_wins() {
        let mut repo = MappingRepository::new();
        repo.add_property("Button.Visibility", SymbolMapping::name_only("Opacity"));
        let mut ctx =
            MigrationContext::new(TypeResolutionPolicy::Optional, Arc::new(repo));
        let (mut doc, _, pid) = doc_with_attribute("Visibility", "Visible");
        run(&mut doc, &mut ctx);
        assert_eq!(doc.property(pid).name, "Opacity");
        // Injected NameOnly record carries no value map
        assert_eq!(doc.property(pid).as_str().unwrap(), "Visible");
    }
}
