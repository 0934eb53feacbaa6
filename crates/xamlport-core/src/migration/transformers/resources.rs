//! Resource-reference rewrite (priority 45)
//!
//! Rewrites references to WPF system resources onto Avalonia's theme
//! resources. WPF addresses them through `{x:Static SystemColors.*Key}`
//! expressions nested inside a resource reference; Avalonia uses plain
//! theme keys that follow the active theme, so the rewrite also forces the
//! reference dynamic. Document-local resource references are compatible
//! and pass through untouched.

use crate::document::extension::known;
use crate::document::{Document, ExtensionValue, NodeState, PropertyId};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::migration::transformer::{priority, PropertyTransformer};
use std::collections::BTreeMap;

/// WPF system-resource key expression → Avalonia theme key
fn builtin_system_keys() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("SystemColors.WindowBrushKey", "ThemeBackgroundBrush"),
        ("SystemColors.ControlBrushKey", "ThemeControlMidBrush"),
        ("SystemColors.ControlTextBrushKey", "ThemeForegroundBrush"),
        ("SystemColors.HighlightBrushKey", "ThemeAccentBrush"),
        ("SystemColors.GrayTextBrushKey", "ThemeForegroundLowBrush"),
        ("SystemFonts.MessageFontSizeKey", "FontSizeNormal"),
    ])
}

pub struct ResourceTransformer {
    system_keys: BTreeMap<&'static str, &'static str>,
}

impl ResourceTransformer {
    pub fn new() -> Self {
        Self {
            system_keys: builtin_system_keys(),
        }
    }

    /// The system-key member path of a reference whose key is an
    /// `{x:Static ...}` expression, e.g. `SystemColors.WindowBrushKey`
    fn static_system_key(&self, document: &Document, property: PropertyId) -> Option<String> {
        let extension = document.property(property).try_as_extension()?;
        if !extension.is_resource_reference() {
            return None;
        }
        let nested = extension.first_positional()?.try_as_extension()?;
        if nested.name != known::STATIC {
            return None;
        }
        let member = match nested.first_positional()? {
            ExtensionValue::String(s) => s.as_str(),
            ExtensionValue::TypeRef(s) => s.as_str(),
            _ => return None,
        };
        Some(member.to_string())
    }
}

impl Default for ResourceTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTransformer for ResourceTransformer {
    fn name(&self) -> &str {
        "resources"
    }

    fn priority(&self) -> i32 {
        priority::RESOURCES
    }

    fn should_transform(
        &self,
        document: &Document,
        property: PropertyId,
        _ctx: &MigrationContext,
    ) -> bool {
        self.static_system_key(document, property)
            .map(|member| self.system_keys.contains_key(member.as_str()))
            .unwrap_or(false)
    }

    fn transform_property(
        &self,
        document: &mut Document,
        property: PropertyId,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        let Some(member) = self.static_system_key(document, property) else {
            return Ok(());
        };
        let Some(theme_key) = self.system_keys.get(member.as_str()).copied() else {
            return Ok(());
        };

        let prop = document.property_mut(property);
        if let Some(extension) = prop.try_as_extension_mut() {
            // Theme resources follow the active theme; the reference must
            // be dynamic on the Avalonia side.
            extension.name = known::DYNAMIC_RESOURCE.to_string();
            extension.positional = vec![ExtensionValue::String(theme_key.to_string())];
            extension.semantic = None;
        }
        prop.state = prop.state.advance(NodeState::Transformed);
        ctx.statistics.increment_count("SystemResourcesRewritten");
        log::debug!("system resource '{}' -> '{}'", member, theme_key);
        Ok(())
    }
}
