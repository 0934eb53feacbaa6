//! Namespace rewrite (priority 10)
//!
//! Rewrites the document's xmlns prefix map and every element's namespace
//! URI before any name-level transformer runs. The WPF presentation
//! namespace maps to Avalonia's; the XAML language namespace maps to
//! itself (verified compatibility, deliberately not counted as a
//! transformation); `clr-namespace:` declarations re-encode to Avalonia's
//! `using:` form, dropping the `;assembly=` suffix.

use crate::document::{Document, TreeWalk};
use crate::error::Result;
use crate::migration::context::MigrationContext;
use crate::migration::mapping::{MappingRepository, SymbolMapping};
use crate::migration::transformer::{priority, Transformer};
use crate::resolver::registry::{WPF_PRESENTATION_NS, XAML_LANGUAGE_NS};
use regex::Regex;
use std::sync::OnceLock;

/// Avalonia's default xmlns URI
pub const AVALONIA_NS: &str = "https://github.com/avaloniaui";

fn clr_namespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // `clr-namespace:Some.Ns` with an optional `;assembly=Name` tail
        Regex::new(r"^clr-namespace:([^;]+)(?:;assembly=.+)?$").expect("static pattern compiles")
    })
}

/// Illustrative built-in table; injected repositories take precedence
fn builtin_mappings() -> MappingRepository {
    let mut repo = MappingRepository::new();
    repo.add_namespace(WPF_PRESENTATION_NS, SymbolMapping::name_only(AVALONIA_NS));
    // Same-name record documenting that the XAML language namespace is
    // shared between the frameworks
    repo.add_namespace(XAML_LANGUAGE_NS, SymbolMapping::name_only(XAML_LANGUAGE_NS));
    repo
}

/// Maps a single namespace URI, injected table first
fn map_namespace(ctx: &MigrationContext, builtin: &MappingRepository, uri: &str) -> Option<String> {
    let record = ctx
        .mappings
        .namespace_mapping(uri)
        .or_else(|| builtin.namespace_mapping(uri))?;
    if record.is_identity_for(uri) {
        return None;
    }
    Some(record.target_name.clone())
}

/// `clr-namespace:Foo;assembly=Bar` → `using:Foo`
fn reencode_clr_namespace(uri: &str) -> Option<String> {
    let captures = clr_namespace_pattern().captures(uri)?;
    Some(format!("using:{}", &captures[1]))
}

pub struct NamespaceTransformer {
    builtin: MappingRepository,
}

impl NamespaceTransformer {
    pub fn new() -> Self {
        Self {
            builtin: builtin_mappings(),
        }
    }

    fn target_for(&self, ctx: &MigrationContext, uri: &str) -> Option<String> {
        map_namespace(ctx, &self.builtin, uri).or_else(|| reencode_clr_namespace(uri))
    }
}

impl Default for NamespaceTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for NamespaceTransformer {
    fn name(&self) -> &str {
        "namespaces"
    }

    fn priority(&self) -> i32 {
        priority::NAMESPACES
    }

    fn transform(&self, document: &mut Document, ctx: &mut MigrationContext) -> Result<()> {
        // Prefix map first
        let rewrites: Vec<(String, String)> = document
            .symbols
            .prefixes()
            .filter_map(|(prefix, uri)| {
                self.target_for(ctx, uri)
                    .map(|target| (prefix.to_string(), target))
            })
            .collect();
        for (prefix, target) in &rewrites {
            document.symbols.set_prefix(prefix.clone(), target.clone());
            ctx.statistics.namespaces_transformed += 1;
            log::debug!("xmlns:{} -> {}", prefix, target);
        }

        // Then every element's own namespace; these piggyback on the
        // prefix rewrites and are not counted again.
        let mut walk = TreeWalk::from_document(document);
        while let Some(id) = walk.next(document) {
            let uri = document.element(id).namespace.clone();
            if let Some(target) = self.target_for(ctx, &uri) {
                let element = document.element_mut(id);
                element.namespace = target;
                element.mark_transformed();
            }
        }

        Ok(())
    }
}
