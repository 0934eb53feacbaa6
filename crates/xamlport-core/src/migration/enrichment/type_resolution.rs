//! Type-resolution pass
//!
//! Resolves every element's type and every property's member record.
//! Severity of a miss follows the active [`TypeResolutionPolicy`], except
//! attached-property owner misses, which are always warnings: attached
//! ownership frequently lives outside the resolvable type universe.

use crate::diagnostics::codes;
use crate::document::{Document, ElementId, NodeState, TreeWalk};
use crate::error::{Error, Result, TypeResolutionPolicy, UnresolvedType};
use crate::migration::context::MigrationContext;
use crate::resolver::{TypeInfo, TypeResolver};
use std::sync::Arc;

pub(super) fn run(
    resolver: &dyn TypeResolver,
    document: &mut Document,
    ctx: &mut MigrationContext,
) -> Result<()> {
    let mut unresolved: Vec<UnresolvedType> = Vec::new();

    let mut walk = TreeWalk::from_document(document);
    while let Some(id) = walk.next(document) {
        resolve_element(resolver, document, id, ctx, &mut unresolved)?;
        resolve_members(resolver, document, id, ctx);
    }

    if !unresolved.is_empty() {
        return Err(Error::TypeResolution { records: unresolved });
    }
    Ok(())
}

fn resolve_element(
    resolver: &dyn TypeResolver,
    document: &mut Document,
    id: ElementId,
    ctx: &mut MigrationContext,
    unresolved: &mut Vec<UnresolvedType>,
) -> Result<()> {
    let element = document.element(id);
    if element.resolved_type.is_some() {
        return Ok(());
    }
    let namespace = element.namespace.clone();
    let type_name = element.type_name.clone();
    let location = element.location;

    let resolved = resolve_with_policy(resolver, &namespace, &type_name, &ctx.policy);
    match resolved {
        Some(info) => {
            let element = document.element_mut(id);
            element.resolved_type = Some(info);
            element.state = element.state.advance(NodeState::Analyzed);
        }
        None => {
            document.element_mut(id).mark_failed();
            let message = format!("cannot resolve type '{}' in '{}'", type_name, namespace);
            let record = UnresolvedType {
                namespace,
                name: type_name,
                location,
            };
            let policy = ctx.policy.clone();
            match policy {
                TypeResolutionPolicy::Optional | TypeResolutionPolicy::BestEffort { .. } => {
                    ctx.warn(codes::UNRESOLVED_TYPE, message, location);
                }
                TypeResolutionPolicy::Required { fail_fast } => {
                    ctx.error(codes::UNRESOLVED_TYPE, message, location);
                    if fail_fast {
                        return Err(Error::TypeResolution {
                            records: vec![record],
                        });
                    }
                    unresolved.push(record);
                }
            }
        }
    }
    Ok(())
}

/// Resolve a type, retrying fallback namespaces under BestEffort
fn resolve_with_policy(
    resolver: &dyn TypeResolver,
    namespace: &str,
    type_name: &str,
    policy: &TypeResolutionPolicy,
) -> Option<Arc<TypeInfo>> {
    if let Some(info) = resolver.resolve(namespace, type_name) {
        return Some(info);
    }
    if let TypeResolutionPolicy::BestEffort {
        fallback_namespaces,
    } = policy
    {
        for fallback in fallback_namespaces {
            if let Some(info) = resolver.resolve(fallback, type_name) {
                log::debug!(
                    "resolved '{}' through fallback namespace '{}'",
                    type_name,
                    fallback
                );
                return Some(info);
            }
        }
    }
    None
}

fn resolve_members(
    resolver: &dyn TypeResolver,
    document: &mut Document,
    id: ElementId,
    ctx: &mut MigrationContext,
) {
    let Some(owner_type) = document.element(id).resolved_type.clone() else {
        return;
    };
    let namespace = document.element(id).namespace.clone();
    let property_ids: Vec<_> = document.element(id).properties().to_vec();

    for pid in property_ids {
        let property = document.property(pid);
        if property.resolved_member.is_some() {
            continue;
        }
        let name = property.name.clone();
        let attached_owner = property.attached_owner.clone();
        let location = property.location;

        match attached_owner {
            None => match owner_type.property(&name) {
                Some(member) => {
                    let member = member.clone();
                    let property = document.property_mut(pid);
                    property.resolved_member = Some(member);
                    property.state = property.state.advance(NodeState::Analyzed);
                }
                None => {
                    document.property_mut(pid).state = NodeState::Failed;
                    let message = format!(
                        "type '{}' has no property '{}'",
                        owner_type.name, name
                    );
                    if matches!(ctx.policy, TypeResolutionPolicy::Required { .. }) {
                        ctx.error(codes::UNRESOLVED_PROPERTY, message, location);
                    } else {
                        ctx.warn(codes::UNRESOLVED_PROPERTY, message, location);
                    }
                }
            },
            // Attached ownership resolves separately; failure is a
            // warning under every policy.
            Some(attached) => {
                match resolver
                    .resolve(&namespace, &attached)
                    .or_else(|| resolver.resolve_full_name(&attached))
                {
                    Some(attached_type) => match attached_type.property(&name) {
                        Some(member) => {
                            let member = member.clone();
                            let property = document.property_mut(pid);
                            property.resolved_member = Some(member);
                            property.state = property.state.advance(NodeState::Analyzed);
                        }
                        None => {
                            document.property_mut(pid).state = NodeState::Failed;
                            ctx.warn(
                                codes::UNRESOLVED_PROPERTY,
                                format!(
                                    "attached owner '{}' declares no property '{}'",
                                    attached, name
                                ),
                                location,
                            );
                        }
                    },
                    None => {
                        document.property_mut(pid).state = NodeState::Failed;
                        ctx.warn(
                            codes::UNRESOLVED_ATTACHED_OWNER,
                            format!("cannot resolve attached-property owner '{}'", attached),
                            location,
                        );
                    }
                }
            }
        }
    }
}
