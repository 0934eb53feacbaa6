//! Injected symbol-mapping repository
//!
//! The engine holds no mapping data of its own beyond what individual
//! transformers hardcode for illustration; production tables are built by
//! callers or deserialized from JSON and injected through the
//! `MigrationContext`. A lookup returns zero or one record per source
//! symbol.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a mapping record asks the consuming transformer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingKind {
    /// Rename only; a same-name record documents verified compatibility
    NameOnly,
    /// Rename plus value re-encoding through the record's value map
    NameAndValueChange,
    /// No target equivalent: flag, never delete
    Removed,
    /// Rename plus a code-registered converter
    Custom,
}

/// One entry of a value map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMapEntry {
    pub target: String,
    /// Set when this source value collapses onto a target value that
    /// another source value also maps to, losing a distinction
    #[serde(default)]
    pub lossy: bool,
}

/// Source-value → target-value table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMap {
    entries: BTreeMap<String, ValueMapEntry>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: &str, target: &str) -> Self {
        self.entries.insert(
            source.to_string(),
            ValueMapEntry {
                target: target.to_string(),
                lossy: false,
            },
        );
        self
    }

    pub fn with_lossy(mut self, source: &str, target: &str) -> Self {
        self.entries.insert(
            source.to_string(),
            ValueMapEntry {
                target: target.to_string(),
                lossy: true,
            },
        );
        self
    }

    pub fn map(&self, source: &str) -> Option<&ValueMapEntry> {
        self.entries.get(source)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Signature for code-registered value converters
pub type ValueConverter = fn(&str) -> Option<String>;

/// One mapping record for a source symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolMapping {
    /// Target symbol name; empty for `Removed` records
    pub target_name: String,
    pub kind: MappingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<ValueMap>,
    /// Converters cannot round-trip through JSON; they are registered in
    /// code on top of a deserialized table when needed
    #[serde(skip)]
    pub converter: Option<ValueConverter>,
}

impl SymbolMapping {
    pub fn name_only(target: &str) -> Self {
        Self {
            target_name: target.to_string(),
            kind: MappingKind::NameOnly,
            value_map: None,
            converter: None,
        }
    }

    pub fn rename_with_values(target: &str, value_map: ValueMap) -> Self {
        Self {
            target_name: target.to_string(),
            kind: MappingKind::NameAndValueChange,
            value_map: Some(value_map),
            converter: None,
        }
    }

    pub fn removed() -> Self {
        Self {
            target_name: String::new(),
            kind: MappingKind::Removed,
            value_map: None,
            converter: None,
        }
    }

    pub fn custom(target: &str, converter: ValueConverter) -> Self {
        Self {
            target_name: target.to_string(),
            kind: MappingKind::Custom,
            value_map: None,
            converter: Some(converter),
        }
    }

    /// Whether applying this record to `source` would change nothing —
    /// same-name records are deliberate no-ops documenting compatibility
    pub fn is_identity_for(&self, source: &str) -> bool {
        self.kind == MappingKind::NameOnly && self.target_name == source
    }
}

/// Lookup tables for namespaces, types, properties, and events
///
/// Property keys may be qualified (`"TextBox.Text"`) or bare (`"Text"`);
/// qualified entries win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingRepository {
    #[serde(default)]
    namespaces: BTreeMap<String, SymbolMapping>,
    #[serde(default)]
    types: BTreeMap<String, SymbolMapping>,
    #[serde(default)]
    properties: BTreeMap<String, SymbolMapping>,
    #[serde(default)]
    events: BTreeMap<String, SymbolMapping>,
}

impl MappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize a repository from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Configuration {
            message: format!("invalid mapping repository JSON: {}", e),
            source: None,
        })
    }

    pub fn add_namespace(&mut self, source_uri: &str, mapping: SymbolMapping) {
        self.namespaces.insert(source_uri.to_string(), mapping);
    }

    pub fn add_type(&mut self, source_name: &str, mapping: SymbolMapping) {
        self.types.insert(source_name.to_string(), mapping);
    }

    pub fn add_property(&mut self, source_key: &str, mapping: SymbolMapping) {
        self.properties.insert(source_key.to_string(), mapping);
    }

    pub fn add_event(&mut self, source_name: &str, mapping: SymbolMapping) {
        self.events.insert(source_name.to_string(), mapping);
    }

    pub fn namespace_mapping(&self, source_uri: &str) -> Option<&SymbolMapping> {
        self.namespaces.get(source_uri)
    }

    pub fn type_mapping(&self, source_name: &str) -> Option<&SymbolMapping> {
        self.types.get(source_name)
    }

    /// Type-qualified lookup first, bare name second
    pub fn property_mapping(
        &self,
        owner_type: Option<&str>,
        source_name: &str,
    ) -> Option<&SymbolMapping> {
        if let Some(owner) = owner_type {
            let qualified = format!("{}.{}", owner, source_name);
            if let Some(mapping) = self.properties.get(&qualified) {
                return Some(mapping);
            }
        }
        self.properties.get(source_name)
    }

    pub fn event_mapping(&self, source_name: &str) -> Option<&SymbolMapping> {
        self.events.get(source_name)
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
            && self.types.is_empty()
            && self.properties.is_empty()
            && self.events.is_empty()
    }
}
