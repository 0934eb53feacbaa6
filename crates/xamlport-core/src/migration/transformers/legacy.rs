//! Legacy rule set hosted by the rule bridge
//!
//! These rules were written against the older node-at-a-time contract and
//! run inside a [`RuleBridge`](crate::migration::transformer::RuleBridge)
//! at priority 35 — after generic property renames, before binding work.

use crate::diagnostics::codes;
use crate::document::{metadata_keys, Document, NodeState};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::migration::transformer::rules::{MigrationRule, RuleTarget};

/// `ToolTipService.ToolTip` is addressed as `ToolTip.Tip` in Avalonia
pub struct ToolTipServiceRule;

impl MigrationRule for ToolTipServiceRule {
    fn name(&self) -> &str {
        "tooltip-service"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn can_transform(&self, document: &Document, target: RuleTarget) -> bool {
        let RuleTarget::Property(pid) = target else {
            return false;
        };
        let property = document.property(pid);
        property.attached_owner.as_deref() == Some("ToolTipService") && property.name == "ToolTip"
    }

    fn apply(
        &self,
        document: &mut Document,
        target: RuleTarget,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        let RuleTarget::Property(pid) = target else {
            return Ok(());
        };
        let property = document.property_mut(pid);
        property
            .metadata
            .set(metadata_keys::ORIGINAL_NAME, "ToolTipService.ToolTip");
        property.attached_owner = Some("ToolTip".to_string());
        property.name = "Tip".to_string();
        property.state = property.state.advance(NodeState::Transformed);
        ctx.statistics.properties_transformed += 1;
        Ok(())
    }
}

/// Other `ToolTipService.*` settings have no Avalonia counterpart
pub struct ToolTipServiceExtrasRule;

impl MigrationRule for ToolTipServiceExtrasRule {
    fn name(&self) -> &str {
        "tooltip-service-extras"
    }

    fn priority(&self) -> i32 {
        // After the main tooltip rule, so `ToolTip` itself is already
        // renamed and never reaches this rule.
        5
    }

    fn can_transform(&self, document: &Document, target: RuleTarget) -> bool {
        let RuleTarget::Property(pid) = target else {
            return false;
        };
        let property = document.property(pid);
        property.attached_owner.as_deref() == Some("ToolTipService")
            && !property.metadata.has_flag(metadata_keys::UNSUPPORTED)
    }

    fn apply(
        &self,
        document: &mut Document,
        target: RuleTarget,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        let RuleTarget::Property(pid) = target else {
            return Ok(());
        };
        let qualified = document.property(pid).qualified_name();
        let location = document.property(pid).location;
        document
            .property_mut(pid)
            .metadata
            .set_flag(metadata_keys::UNSUPPORTED);
        ctx.warn(
            codes::UNSUPPORTED_CONSTRUCT,
            format!("'{}' has no Avalonia equivalent; property flagged", qualified),
            location,
        );
        Ok(())
    }
}

/// The rule set the default pipeline hosts
pub fn default_legacy_rules() -> Vec<Box<dyn MigrationRule>> {
    vec![
        Box::new(ToolTipServiceRule),
        Box::new(ToolTipServiceExtrasRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypeResolutionPolicy;
    use crate::migration::mapping::MappingRepository;
    use crate::migration::transformer::{RuleBridge, Transformer};
    use std::sync::Arc;

    fn context() -> MigrationContext {
        MigrationContext::new(
            TypeResolutionPolicy::Optional,
            Arc::new(MappingRepository::default()),
        )
    }

    fn bridge() -> RuleBridge {
        RuleBridge::new("legacy-rules", 35, default_legacy_rules())
    }

    #[test]
    fn test_tooltip_renamed_before_extras_fire() {
        let mut doc = Document::new(None);
        let root = doc.create_element("Button", "wpf");
        doc.set_root(root).unwrap();
        let tip = doc.add_attribute(root, "ToolTipService.ToolTip", "Saves").unwrap();
        let delay = doc
            .add_attribute(root, "ToolTipService.InitialShowDelay", "500")
            .unwrap();

        let mut ctx = context();
        bridge().transform(&mut doc, &mut ctx).unwrap();

        // The higher-priority rename ran first, so the tip escaped the
        // unsupported flag
        assert_eq!(doc.property(tip).qualified_name(), "ToolTip.Tip");
        assert!(!doc.property(tip).metadata.has_flag(metadata_keys::UNSUPPORTED));

        // The extra setting got flagged, not deleted
        assert!(doc.property(delay).metadata.has_flag(metadata_keys::UNSUPPORTED));
        assert_eq!(doc.property(delay).as_str().unwrap(), "500");
        assert_eq!(ctx.diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut doc = Document::new(None);
        let root = doc.create_element("Button", "wpf");
        doc.set_root(root).unwrap();
        doc.add_attribute(root, "ToolTipService.InitialShowDelay", "500")
            .unwrap();

        let mut ctx = context();
        let bridge = bridge();
        bridge.transform(&mut doc, &mut ctx).unwrap();
        bridge.transform(&mut doc, &mut ctx).unwrap();
        assert_eq!(ctx.diagnostics.warning_count(), 1);
    }
}
