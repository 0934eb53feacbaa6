//! Binding-analysis pass
//!
//! Summarizes every data-binding expression: a binding must specify at
//! least one of path, element-name reference, relative-source expression,
//! or explicit source; element-name references must resolve against the
//! named-element table. Findings are warnings — bindings are late-bound by
//! nature and the engine cannot prove them wrong, only suspicious.

use crate::diagnostics::codes;
use crate::document::{
    BindingDetail, Document, ExtensionValue, MarkupExtension, NodeState, SemanticDetail, TreeWalk,
};
use crate::migration::context::MigrationContext;

pub(super) fn run(document: &mut Document, ctx: &mut MigrationContext) {
    let mut walk = TreeWalk::from_document(document);
    while let Some(id) = walk.next(document) {
        let property_ids: Vec<_> = document.element(id).properties().to_vec();
        for pid in property_ids {
            let property = document.property(pid);
            let location = property.location;
            let Some(extension) = property.try_as_extension() else {
                continue;
            };
            if !extension.is_binding() {
                continue;
            }

            let mut detail = summarize(extension);

            if detail.is_empty() {
                ctx.warn(
                    codes::EMPTY_BINDING,
                    "binding specifies no path, element name, relative source, or source",
                    location,
                );
            }

            if let Some(name) = detail.element_name.clone() {
                match document.symbols.named_element(&name) {
                    Some(symbol) => detail.resolved_element = Some(symbol.element),
                    None => ctx.warn(
                        codes::UNRESOLVED_ELEMENT_NAME,
                        format!("binding references unknown element name '{}'", name),
                        location,
                    ),
                }
            }

            let property = document.property_mut(pid);
            if let Some(extension) = property.try_as_extension_mut() {
                extension.semantic = Some(SemanticDetail::Binding(detail));
            }
            let property = document.property_mut(pid);
            property.state = property.state.advance(NodeState::Analyzed);
        }
    }
}

/// Read the four defining facets out of a binding expression
fn summarize(extension: &MarkupExtension) -> BindingDetail {
    let path = extension
        .first_positional()
        .and_then(ExtensionValue::try_as_str)
        .map(str::to_string)
        .or_else(|| {
            extension
                .argument("Path")
                .and_then(ExtensionValue::try_as_str)
                .map(str::to_string)
        });

    let element_name = extension
        .argument("ElementName")
        .and_then(ExtensionValue::try_as_str)
        .map(str::to_string);

    let has_relative_source = extension
        .argument("RelativeSource")
        .map(|v| {
            matches!(
                v,
                ExtensionValue::RelativeSource(_) | ExtensionValue::Extension(_)
            )
        })
        .unwrap_or(false);

    let has_source = extension.argument("Source").is_some();

    BindingDetail {
        path,
        element_name,
        has_relative_source,
        has_source,
        resolved_element: None,
    }
}
