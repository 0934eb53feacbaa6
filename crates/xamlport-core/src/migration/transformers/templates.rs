//! Template rewrite (priority 55)
//!
//! Control and data templates carry the same two migration hazards as
//! styles: a `TargetType` to re-encode and a trigger collection with no
//! Avalonia equivalent. Template bindings themselves are compatible (the
//! binding pass at priority 40 already converted `TemplatedParent`
//! relative sources), so the template body passes through untouched.

use super::styles::{flag_triggers, reencode_target_type};
use crate::document::{Document, ElementId};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::migration::transformer::{priority, ElementTransformer};

const TEMPLATE_TYPES: [&str; 3] = ["ControlTemplate", "DataTemplate", "ItemsPanelTemplate"];

pub struct TemplateTransformer;

impl TemplateTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TemplateTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTransformer for TemplateTransformer {
    fn name(&self) -> &str {
        "templates"
    }

    fn priority(&self) -> i32 {
        priority::TEMPLATES
    }

    fn should_transform(
        &self,
        document: &Document,
        element: ElementId,
        _ctx: &MigrationContext,
    ) -> bool {
        TEMPLATE_TYPES.contains(&document.element(element).type_name.as_str())
    }

    fn transform_element(
        &self,
        document: &mut Document,
        element: ElementId,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        reencode_target_type(document, element, ctx);
        flag_triggers(document, element, ctx, "TemplateTriggersFlagged");
        Ok(())
    }
}
