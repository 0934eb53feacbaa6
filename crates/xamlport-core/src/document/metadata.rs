//! Sidecar metadata bags
//!
//! Every node (and the document itself) carries a string-keyed metadata bag
//! for data produced by one stage and consumed by a later one. Keys are
//! stable constants owned by the producing stage; see [`keys`] for the
//! engine-owned ones. Values are JSON so callers can stash typed data
//! without the tree model knowing about their types.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Engine-owned metadata keys
///
/// Third parties should namespace their own keys (`"vendor.keyname"`) to
/// avoid collisions.
pub mod keys {
    /// Set (to `true`) on nodes with no Avalonia equivalent. The engine
    /// never deletes such nodes; the serializer decides their fate.
    pub const UNSUPPORTED: &str = "xamlport.unsupported";
    /// Set on properties whose mapping kind is `Removed`.
    pub const REMOVED: &str = "xamlport.removed";
    /// Styled-vs-direct classification result for a property, written by
    /// the style pass (`"styled"` or `"direct"`).
    pub const REPRESENTATION: &str = "xamlport.representation";
    /// Original source name recorded by rename transformers before they
    /// overwrite the name in place.
    pub const ORIGINAL_NAME: &str = "xamlport.original-name";
}

/// A per-node key/value store, typed at the call site
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataBag {
    entries: BTreeMap<String, Value>,
}

impl MetadataBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a serializable value under `key`, replacing any prior value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        // Serialization of plain data cannot fail; fall back to Null rather
        // than poisoning the bag if a caller hands us something exotic.
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.entries.insert(key.to_string(), value);
    }

    /// Read a value back at its original type
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Read a value, falling back to `default` when absent or mistyped
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Raw JSON access for callers that match on shape
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Set a boolean marker flag
    pub fn set_flag(&mut self, key: &str) {
        self.set(key, true);
    }

    /// Whether a marker flag is present and true
    pub fn has_flag(&self, key: &str) -> bool {
        self.get_or(key, false)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_round_trip() {
        let mut bag = MetadataBag::new();
        bag.set("answer", 42u32);
        bag.set("label", "hello");
        assert_eq!(bag.get::<u32>("answer"), Some(42));
        assert_eq!(bag.get::<String>("label"), Some("hello".to_string()));
        assert_eq!(bag.get::<u32>("missing"), None);
    }

    #[test]
    fn test_get_or_default() {
        let bag = MetadataBag::new();
        assert_eq!(bag.get_or("absent", 7u32), 7);
    }

    #[test]
    fn test_flags() {
        let mut bag = MetadataBag::new();
        assert!(!bag.has_flag(keys::UNSUPPORTED));
        bag.set_flag(keys::UNSUPPORTED);
        assert!(bag.has_flag(keys::UNSUPPORTED));
    }

    #[test]
    fn test_mistyped_read_returns_none() {
        let mut bag = MetadataBag::new();
        bag.set("label", "not a number");
        assert_eq!(bag.get::<u32>("label"), None);
    }
}
