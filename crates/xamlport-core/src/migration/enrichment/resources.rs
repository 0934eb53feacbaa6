//! Resource-resolution pass
//!
//! Links static and dynamic resource references to the entries the symbol
//! table collected, and warns about every key that has no entry. A miss is
//! reported once per reference, never raised.

use crate::diagnostics::codes;
use crate::document::{Document, NodeState, SemanticDetail, TreeWalk};
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
            if !extension.is_resource_reference() {
                continue;
            }

            let Some(key) = extension.resource_key().map(str::to_string) else {
                ctx.warn(
                    codes::UNRESOLVED_RESOURCE,
                    format!("'{}' reference carries no resource key", extension.name),
                    location,
                );
                continue;
            };

            let resolved = document
                .symbols
                .resource(&key)
                .map(|symbol| (symbol.element, symbol.type_name.clone()));

            match resolved {
                Some((target, type_name)) => {
                    let property = document.property_mut(pid);
                    if let Some(extension) = property.try_as_extension_mut() {
                        extension.semantic = Some(SemanticDetail::Resource {
                            key,
                            target,
                            type_name: Some(type_name),
                        });
                    }
                    let property = document.property_mut(pid);
                    property.state = property.state.advance(NodeState::Analyzed);
                }
                None => {
                    ctx.warn(
                        codes::UNRESOLVED_RESOURCE,
                        format!("resource key '{}' is not defined in this document", key),
                        location,
                    );
                }
            }
        }
    }
}
