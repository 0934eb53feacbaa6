//! Type resolution
//!
//! The engine sees the source framework's type system only through the
//! [`TypeResolver`] trait. Implementations may wrap reflection data, a
//! compiler's symbol table, or the in-memory registry shipped here —
//! transformer code never branches on which one is active, and must keep
//! working when resolution fails entirely (the Optional policy's common
//! case).

pub mod registry;

pub use registry::{FieldDeclaration, PropertyDeclaration, RegistryResolver, TypeDeclaration};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One member record on a resolved type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    /// Type name of the property's value
    pub property_type: String,
    /// Declared through the attached-property convention rather than an
    /// ordinary accessor pair
    pub is_attached: bool,
    pub can_read: bool,
    pub can_write: bool,
}

impl PropertyInfo {
    pub fn is_read_only(&self) -> bool {
        self.can_read && !self.can_write
    }
}

/// A resolved type handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub namespace: String,
    pub is_public: bool,
    /// Full name of the base type, when any
    pub base_type: Option<String>,
    pub is_value_type: bool,
    pub is_enum: bool,
    pub interfaces: Vec<String>,
    /// Members, base-chain members included, in declaration order
    pub properties: Vec<PropertyInfo>,
}

impl TypeInfo {
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Member lookup by local name
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Resolves qualified names to type handles
pub trait TypeResolver: std::fmt::Debug + Send + Sync {
    /// Resolve by namespace URI (or namespace declaration) and local name
    fn resolve(&self, namespace: &str, local_name: &str) -> Option<Arc<TypeInfo>>;

    /// Resolve by dotted full name
    fn resolve_full_name(&self, full_name: &str) -> Option<Arc<TypeInfo>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_composition() {
        let info = TypeInfo {
            name: "Button".to_string(),
            namespace: "System.Windows.Controls".to_string(),
            is_public: true,
            base_type: None,
            is_value_type: false,
            is_enum: false,
            interfaces: vec![],
            properties: vec![],
        };
        assert_eq!(info.full_name(), "System.Windows.Controls.Button");
    }

    #[test]
    fn test_read_only_detection() {
        let info = PropertyInfo {
            name: "ActualWidth".to_string(),
            property_type: "Double".to_string(),
            is_attached: false,
            can_read: true,
            can_write: false,
        };
        assert!(info.is_read_only());
    }
}
