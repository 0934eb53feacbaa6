//! Rule-bridge adapter
//!
//! An older, simpler rule abstraction predates the transformer contract:
//! a rule answers `can_transform` for a single node and rewrites it in
//! place. The [`RuleBridge`] hosts a list of such rules inside one
//! primary-contract transformer — sorted by their own priority
//! (descending) once at construction — and drives them over a single
//! document walk: every matching rule is applied to each element, to each
//! of its properties, and to each property's markup extension; element
//! subtrees hanging off property values are covered by the shared walk.
//! This is the seam for onboarding independently authored rule sets (or a
//! third rule dialect) without touching the orchestrator.

use super::Transformer;
use crate::document::{Document, ElementId, PropertyId, TreeWalk};
use crate::error::Result;
use crate::migration::context::MigrationContext;

/// What a rule is being offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    Element(ElementId),
    Property(PropertyId),
    /// The markup-extension value of the given property
    Extension(PropertyId),
}

/// The secondary, node-at-a-time rewrite contract
pub trait MigrationRule {
    fn name(&self) -> &str;

    /// Rules with higher priority run first within the bridge
    fn priority(&self) -> i32 {
        0
    }

    fn can_transform(&self, document: &Document, target: RuleTarget) -> bool;

    fn apply(
        &self,
        document: &mut Document,
        target: RuleTarget,
        ctx: &mut MigrationContext,
    ) -> Result<()>;
}

/// Hosts a rule list behind the primary transformer contract
pub struct RuleBridge {
    name: String,
    priority: i32,
    rules: Vec<Box<dyn MigrationRule>>,
}

impl RuleBridge {
    pub fn new(
        name: impl Into<String>,
        priority: i32,
        mut rules: Vec<Box<dyn MigrationRule>>,
    ) -> Self {
        // Sorted once, highest rule priority first; name breaks ties so
        // the order is deterministic.
        rules.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| a.name().cmp(b.name()))
        });
        Self {
            name: name.into(),
            priority,
            rules,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn apply_all(
        &self,
        document: &mut Document,
        target: RuleTarget,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        for rule in &self.rules {
            if rule.can_transform(document, target) {
                rule.apply(document, target, ctx)?;
            }
        }
        Ok(())
    }
}

impl Transformer for RuleBridge {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn transform(&self, document: &mut Document, ctx: &mut MigrationContext) -> Result<()> {
        let Some(root) = document.root() else {
            ctx.warn_empty_document(&self.name);
            return Ok(());
        };

        let mut walk = TreeWalk::new(root);
        while let Some(id) = walk.next(document) {
            self.apply_all(document, RuleTarget::Element(id), ctx)?;

            let property_ids: Vec<PropertyId> = document.element(id).properties().to_vec();
            for pid in property_ids {
                self.apply_all(document, RuleTarget::Property(pid), ctx)?;
                if document.property(pid).has_extension_value() {
                    self.apply_all(document, RuleTarget::Extension(pid), ctx)?;
                }
            }
        }
        Ok(())
    }
}
