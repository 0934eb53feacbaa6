//! Markup extension values
//!
//! A markup extension is a named, parameterized value-producing expression
//! embedded as a property's value: `{Binding Path=Name}`,
//! `{StaticResource AccentBrush}`, `{x:Type Button}`. The engine models
//! them structurally — positional and named arguments over a closed value
//! union — so transformers rewrite structure, never raw text.

use crate::diagnostics::Diagnostic;
use crate::document::ElementId;
use crate::error::{Error, Result};

/// Extension names the engine gives structural meaning to
pub mod known {
    pub const BINDING: &str = "Binding";
    pub const TEMPLATE_BINDING: &str = "TemplateBinding";
    pub const STATIC_RESOURCE: &str = "StaticResource";
    pub const DYNAMIC_RESOURCE: &str = "DynamicResource";
    pub const STATIC: &str = "x:Static";
    pub const TYPE: &str = "x:Type";
    pub const NULL: &str = "x:Null";
}

/// Closed union of values a markup-extension argument can hold
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionValue {
    String(String),
    /// A nested extension, e.g. `{Binding Source={StaticResource Model}}`
    Extension(Box<MarkupExtension>),
    RelativeSource(RelativeSourceExpr),
    /// A type reference such as the argument of `{x:Type Button}`
    TypeRef(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl ExtensionValue {
    fn variant_name(&self) -> &'static str {
        match self {
            ExtensionValue::String(_) => "String",
            ExtensionValue::Extension(_) => "Extension",
            ExtensionValue::RelativeSource(_) => "RelativeSource",
            ExtensionValue::TypeRef(_) => "TypeRef",
            ExtensionValue::Number(_) => "Number",
            ExtensionValue::Boolean(_) => "Boolean",
            ExtensionValue::Null => "Null",
        }
    }

    /// String content, failing clearly on any other variant
    pub fn as_str(&self) -> Result<&str> {
        match self {
            ExtensionValue::String(s) => Ok(s),
            other => Err(Error::ValueAccess {
                expected: "String",
                actual: other.variant_name(),
            }),
        }
    }

    pub fn try_as_str(&self) -> Option<&str> {
        match self {
            ExtensionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn try_as_extension(&self) -> Option<&MarkupExtension> {
        match self {
            ExtensionValue::Extension(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn try_as_relative_source(&self) -> Option<&RelativeSourceExpr> {
        match self {
            ExtensionValue::RelativeSource(rs) => Some(rs),
            _ => None,
        }
    }
}

/// Relative-source binding modes
#[derive(Debug, Clone, PartialEq)]
pub enum RelativeSourceMode {
    SelfSource,
    TemplatedParent,
    FindAncestor {
        ancestor_type: Option<String>,
        ancestor_level: u32,
    },
    /// WPF-only; has no Avalonia counterpart
    PreviousData,
}

/// A parsed `RelativeSource` expression
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeSourceExpr {
    pub mode: RelativeSourceMode,
}

impl RelativeSourceExpr {
    pub fn new(mode: RelativeSourceMode) -> Self {
        Self { mode }
    }
}

/// Semantic detail attached to an extension during enrichment
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticDetail {
    /// Resource reference resolved against the document's resource table
    Resource {
        key: String,
        target: ElementId,
        type_name: Option<String>,
    },
    /// Summary of a data-binding expression
    Binding(BindingDetail),
}

/// What a binding expression actually specifies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingDetail {
    pub path: Option<String>,
    pub element_name: Option<String>,
    pub has_relative_source: bool,
    pub has_source: bool,
    /// Element the `ElementName` reference resolved to, when it did
    pub resolved_element: Option<ElementId>,
}

impl BindingDetail {
    /// A binding must specify at least one of these to mean anything
    pub fn is_empty(&self) -> bool {
        self.path.is_none()
            && self.element_name.is_none()
            && !self.has_relative_source
            && !self.has_source
    }
}

/// A named, parameterized value-producing expression
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupExtension {
    /// Extension name as written, prefix included (`Binding`, `x:Static`)
    pub name: String,
    pub positional: Vec<ExtensionValue>,
    /// Named arguments in written order
    pub named: Vec<(String, ExtensionValue)>,
    /// Attached by enrichment; `None` until then, or when unresolvable
    pub semantic: Option<SemanticDetail>,
    /// Findings local to this extension
    pub diagnostics: Vec<Diagnostic>,
}

impl MarkupExtension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positional: Vec::new(),
            named: Vec::new(),
            semantic: None,
            diagnostics: Vec::new(),
        }
    }

    /// Builder-style positional argument
    pub fn with_positional(mut self, value: ExtensionValue) -> Self {
        self.positional.push(value);
        self
    }

    /// Builder-style named argument
    pub fn with_named(mut self, name: impl Into<String>, value: ExtensionValue) -> Self {
        self.named.push((name.into(), value));
        self
    }

    /// First positional argument, if any
    pub fn first_positional(&self) -> Option<&ExtensionValue> {
        self.positional.first()
    }

    /// Named argument lookup
    pub fn argument(&self, name: &str) -> Option<&ExtensionValue> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn argument_mut(&mut self, name: &str) -> Option<&mut ExtensionValue> {
        self.named
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Replace or append a named argument, preserving written order
    pub fn set_argument(&mut self, name: &str, value: ExtensionValue) {
        match self.named.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.named.push((name.to_string(), value)),
        }
    }

    /// Drop a named argument, returning its value when present
    pub fn remove_argument(&mut self, name: &str) -> Option<ExtensionValue> {
        let index = self.named.iter().position(|(n, _)| n == name)?;
        Some(self.named.remove(index).1)
    }

    /// Whether this is a data-binding expression
    pub fn is_binding(&self) -> bool {
        self.name == known::BINDING
    }

    /// Whether this is a static or dynamic resource reference
    pub fn is_resource_reference(&self) -> bool {
        self.name == known::STATIC_RESOURCE || self.name == known::DYNAMIC_RESOURCE
    }

    /// Resource key of a resource reference: first positional, or the
    /// explicit `ResourceKey` argument
    pub fn resource_key(&self) -> Option<&str> {
        if let Some(value) = self.first_positional() {
            if let Some(key) = value.try_as_str() {
                return Some(key);
            }
        }
        self.argument("ResourceKey").and_then(|v| v.try_as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_variant_access_fails_clearly() {
        let value = ExtensionValue::Boolean(true);
        let err = value.as_str().unwrap_err();
        assert!(err.to_string().contains("expected String"));
        assert!(err.to_string().contains("found Boolean"));
        assert_eq!(value.try_as_str(), None);
    }

    #[test]
    fn test_resource_key_positional_and_named() {
        let positional = MarkupExtension::new(known::STATIC_RESOURCE)
            .with_positional(ExtensionValue::String("AccentBrush".to_string()));
        assert_eq!(positional.resource_key(), Some("AccentBrush"));

        let named = MarkupExtension::new(known::DYNAMIC_RESOURCE).with_named(
            "ResourceKey",
            ExtensionValue::String("WindowBackground".to_string()),
        );
        assert_eq!(named.resource_key(), Some("WindowBackground"));
    }

    #[test]
    fn test_set_argument_replaces_in_place() {
        let mut ext = MarkupExtension::new(known::BINDING)
            .with_named("Path", ExtensionValue::String("Name".to_string()))
            .with_named("Mode", ExtensionValue::String("TwoWay".to_string()));

        ext.set_argument("Path", ExtensionValue::String("FullName".to_string()));
        assert_eq!(ext.named[0].0, "Path");
        assert_eq!(ext.named[0].1.try_as_str(), Some("FullName"));
        assert_eq!(ext.named.len(), 2);
    }

    #[test]
    fn test_binding_detail_emptiness() {
        let mut detail = BindingDetail::default();
        assert!(detail.is_empty());
        detail.has_relative_source = true;
        assert!(!detail.is_empty());
    }
}
