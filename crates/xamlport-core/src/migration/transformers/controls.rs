//! Per-control fix-ups (priority 60)
//!
//! The last band: rewrites that only make sense for one control type, run
//! after every generic pass so they can consume the sidecar metadata
//! earlier bands left behind (a `ListView` is already a `ListBox` here,
//! recognizable by its recorded original name).
//!
//! - `Window`: `AllowsTransparency` → `TransparencyLevelHint`,
//!   `WindowStyle` → `SystemDecorations` (both with value re-encoding;
//!   WPF's three bordered styles collapse onto `Full`).
//! - former `Label`: `Content` → `Text` on the renamed `TextBlock`.
//! - former `ListView`: the `View` property element is flagged — column
//!   views must be rebuilt as item templates by hand.

use crate::diagnostics::codes;
use crate::document::{metadata_keys, Document, ElementId, NodeState};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::migration::mapping::ValueMap;
use crate::migration::transformer::{priority, ElementTransformer};

pub struct ControlTransformer;

impl ControlTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ControlTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// The name the element had before the type band renamed it
fn original_name(document: &Document, element: ElementId) -> String {
    document
        .element(element)
        .metadata
        .get(metadata_keys::ORIGINAL_NAME)
        .unwrap_or_else(|| document.element(element).type_name.clone())
}

/// Rename one property and re-encode its string value
fn rename_and_reencode(
    document: &mut Document,
    element: ElementId,
    source: &str,
    target: &str,
    values: &ValueMap,
    ctx: &mut MigrationContext,
) {
    let Some(pid) = document.find_property(element, source) else {
        return;
    };
    let location = document.property(pid).location;
    {
        let prop = document.property_mut(pid);
        prop.metadata.set(metadata_keys::ORIGINAL_NAME, source);
        prop.name = target.to_string();
        prop.state = prop.state.advance(NodeState::Transformed);
    }
    if let Some(value) = document.property(pid).try_as_str().map(str::to_string) {
        if let Some(entry) = values.map(&value) {
            let target_value = entry.target.clone();
            let lossy = entry.lossy;
            document.property_mut(pid).set_string(target_value.clone());
            if lossy {
                ctx.warn(
                    codes::LOSSY_VALUE_MAPPING,
                    format!(
                        "'{}'='{}' collapses to '{}'='{}'",
                        source, value, target, target_value
                    ),
                    location,
                );
            }
        }
    }
    ctx.statistics.properties_transformed += 1;
}

impl ControlTransformer {
    fn transform_window(
        &self,
        document: &mut Document,
        element: ElementId,
        ctx: &mut MigrationContext,
    ) {
        rename_and_reencode(
            document,
            element,
            "AllowsTransparency",
            "TransparencyLevelHint",
            &ValueMap::new().with("True", "Transparent").with("False", "None"),
            ctx,
        );
        rename_and_reencode(
            document,
            element,
            "WindowStyle",
            "SystemDecorations",
            &ValueMap::new()
                .with("None", "None")
                .with("SingleBorderWindow", "Full")
                .with_lossy("ThreeDBorderWindow", "Full")
                .with_lossy("ToolWindow", "Full"),
            ctx,
        );
    }

    fn transform_former_label(
        &self,
        document: &mut Document,
        element: ElementId,
        ctx: &mut MigrationContext,
    ) {
        rename_and_reencode(document, element, "Content", "Text", &ValueMap::new(), ctx);
    }

    fn transform_former_list_view(
        &self,
        document: &mut Document,
        element: ElementId,
        ctx: &mut MigrationContext,
    ) {
        let Some(pid) = document.find_property(element, "View") else {
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
            "ListView column views must be rebuilt as item templates; property flagged",
            location,
        );
        ctx.statistics.increment_count("ListViewViewsFlagged");
    }
}

impl ElementTransformer for ControlTransformer {
    fn name(&self) -> &str {
        "controls"
    }

    fn priority(&self) -> i32 {
        priority::CONTROLS
    }

    fn should_transform(
        &self,
        document: &Document,
        element: ElementId,
        _ctx: &MigrationContext,
    ) -> bool {
        matches!(
            original_name(document, element).as_str(),
            "Window" | "Label" | "ListView"
        )
    }

    fn transform_element(
        &self,
        document: &mut Document,
        element: ElementId,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        match original_name(document, element).as_str() {
            "Window" => self.transform_window(document, element, ctx),
            "Label" => self.transform_former_label(document, element, ctx),
            "ListView" => self.transform_former_list_view(document, element, ctx),
            _ => {}
        }
        Ok(())
    }
}
