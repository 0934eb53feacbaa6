//! Type rename (priority 20)
//!
//! Lookup-table rename of element type names. Same-name records document
//! verified compatibility and are deliberate no-ops — only a name that
//! actually changes counts as transformed. `Removed` records flag the
//! element instead of touching it. Generic `x:TypeArguments` values are
//! re-tokenized structurally so nested argument lists survive the rename.

use crate::diagnostics::{codes, Diagnostic, Severity};
use crate::document::{metadata_keys, Document, ElementId};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::migration::mapping::{MappingKind, MappingRepository, SymbolMapping};
use crate::migration::tokenizer::split_top_level;
use crate::migration::transformer::{priority, ElementTransformer};

/// Illustrative built-in table; injected repositories take precedence
fn builtin_mappings() -> MappingRepository {
    let mut repo = MappingRepository::new();
    repo.add_type("ListView", SymbolMapping::name_only("ListBox"));
    repo.add_type("Label", SymbolMapping::name_only("TextBlock"));
    repo.add_type("GroupBox", SymbolMapping::name_only("HeaderedContentControl"));
    // Verified-compatible controls, recorded so the table is the single
    // source of truth about what has been checked
    repo.add_type("Button", SymbolMapping::name_only("Button"));
    repo.add_type("CheckBox", SymbolMapping::name_only("CheckBox"));
    repo.add_type("StackPanel", SymbolMapping::name_only("StackPanel"));
    repo.add_type("TextBlock", SymbolMapping::name_only("TextBlock"));
    // No Avalonia equivalent at all
    repo.add_type("InkCanvas", SymbolMapping::removed());
    repo
}

pub struct TypeNameTransformer {
    builtin: MappingRepository,
}

impl TypeNameTransformer {
    pub fn new() -> Self {
        Self {
            builtin: builtin_mappings(),
        }
    }

    fn mapping_for<'a>(&'a self, ctx: &'a MigrationContext, name: &str) -> Option<&'a SymbolMapping> {
        ctx.mappings
            .type_mapping(name)
            .or_else(|| self.builtin.type_mapping(name))
    }

    /// Rewrite one type token, recursing into parenthesized argument
    /// lists: `Dictionary(String, List(Int32))` renames the outer name and
    /// every nested argument independently.
    fn rewrite_type_token(&self, ctx: &MigrationContext, token: &str) -> String {
        let token = token.trim();
        let Some(open) = token.find('(') else {
            return match self.mapping_for(ctx, token) {
                Some(m) if m.kind == MappingKind::NameOnly && !m.target_name.is_empty() => {
                    m.target_name.clone()
                }
                _ => token.to_string(),
            };
        };
        let Some(close) = token.rfind(')') else {
            return token.to_string();
        };
        let head = self.rewrite_type_token(ctx, &token[..open]);
        let arguments = split_top_level(&token[open + 1..close], ',')
            .iter()
            .map(|arg| self.rewrite_type_token(ctx, arg))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", head, arguments)
    }
}

impl Default for TypeNameTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTransformer for TypeNameTransformer {
    fn name(&self) -> &str {
        "type-names"
    }

    fn priority(&self) -> i32 {
        priority::TYPES
    }

    fn should_transform(
        &self,
        document: &Document,
        element: ElementId,
        ctx: &MigrationContext,
    ) -> bool {
        let node = document.element(element);
        if node.metadata.has_flag(metadata_keys::UNSUPPORTED) {
            return false;
        }
        let has_type_arguments = node
            .properties()
            .iter()
            .any(|pid| document.property(*pid).name == "TypeArguments");
        match self.mapping_for(ctx, &node.type_name) {
            Some(mapping) => !mapping.is_identity_for(&node.type_name) || has_type_arguments,
            None => has_type_arguments,
        }
    }

    fn transform_element(
        &self,
        document: &mut Document,
        element: ElementId,
        ctx: &mut MigrationContext,
    ) -> Result<()> {
        let source_name = document.element(element).type_name.clone();
        let location = document.element(element).location;

        if let Some(mapping) = self.mapping_for(ctx, &source_name).cloned() {
            match mapping.kind {
                MappingKind::Removed => {
                    let message =
                        format!("'{}' has no Avalonia equivalent; element flagged", source_name);
                    let node = document.element_mut(element);
                    node.metadata.set_flag(metadata_keys::UNSUPPORTED);
                    node.diagnostics.push(Diagnostic::new(
                        Severity::Warning,
                        codes::UNSUPPORTED_CONSTRUCT,
                        message.clone(),
                    ));
                    ctx.warn(codes::UNSUPPORTED_CONSTRUCT, message, location);
                }
                _ if mapping.target_name != source_name && !mapping.target_name.is_empty() => {
                    let target = mapping.target_name.clone();
                    let node = document.element_mut(element);
                    node.metadata.set(metadata_keys::ORIGINAL_NAME, source_name.as_str());
                    node.type_name = target;
                    node.mark_transformed();
                    ctx.statistics.elements_transformed += 1;
                }
                _ => {}
            }
        }

        // Generic type arguments re-tokenize structurally
        if let Some(pid) = document.find_property(element, "TypeArguments") {
            if let Some(value) = document.property(pid).try_as_str().map(str::to_string) {
                let rewritten = split_top_level(&value, ',')
                    .iter()
                    .map(|token| self.rewrite_type_token(ctx, token))
                    .collect::<Vec<_>>()
                    .join(", ");
                if rewritten != value {
                    document.property_mut(pid).set_string(rewritten);
                    ctx.statistics.increment_count("TypeArgumentsRewritten");
                }
            }
        }
        Ok(())
    }
}
