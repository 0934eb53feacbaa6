//! Properties and their tagged-union values

use crate::diagnostics::Location;
use crate::document::extension::MarkupExtension;
use crate::document::metadata::MetadataBag;
use crate::document::{ElementId, NodeState};
use crate::error::{Error, Result};
use crate::resolver::PropertyInfo;

/// How the property was written in markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `<Button Content="..."/>`
    Attribute,
    /// `<Button.Content>...</Button.Content>`
    PropertyElement,
}

/// Closed union of values a property can hold
///
/// The tag determines which accessor is valid; wrong-variant access fails
/// with [`Error::ValueAccess`] instead of coercing.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Element(ElementId),
    Extension(MarkupExtension),
    Null,
}

impl PropertyValue {
    pub fn variant_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Element(_) => "Element",
            PropertyValue::Extension(_) => "Extension",
            PropertyValue::Null => "Null",
        }
    }
}

/// A named property owned by exactly one element
#[derive(Debug, Clone)]
pub struct Property {
    /// Local property name (`Content`, `IsVisible`); never includes the
    /// attached-owner qualifier, which lives in [`Property::attached_owner`]
    pub name: String,
    pub kind: PropertyKind,
    /// Owner type name for attached properties (`Grid` in `Grid.Row`)
    pub attached_owner: Option<String>,
    pub(super) value: PropertyValue,
    pub(super) owner: ElementId,
    /// Member record found on the owner's resolved type during enrichment
    pub resolved_member: Option<PropertyInfo>,
    pub state: NodeState,
    pub metadata: MetadataBag,
    pub location: Option<Location>,
}

impl Property {
    pub(super) fn new(
        name: impl Into<String>,
        kind: PropertyKind,
        value: PropertyValue,
        owner: ElementId,
    ) -> Self {
        let raw_name: String = name.into();
        // `Owner.Property` splits into the attached-owner qualifier and the
        // local name; a plain name passes through untouched.
        let (attached_owner, name) = match raw_name.split_once('.') {
            Some((owner_part, local)) if !owner_part.is_empty() && !local.is_empty() => {
                (Some(owner_part.to_string()), local.to_string())
            }
            _ => (None, raw_name),
        };
        Self {
            name,
            kind,
            attached_owner,
            value,
            owner,
            resolved_member: None,
            state: NodeState::Unanalyzed,
            metadata: MetadataBag::new(),
            location: None,
        }
    }

    /// The element this property belongs to
    pub fn owner(&self) -> ElementId {
        self.owner
    }

    /// Name as addressed in markup: `Owner.Property` for attached
    /// properties, the local name otherwise
    pub fn qualified_name(&self) -> String {
        match &self.attached_owner {
            Some(owner) => format!("{}.{}", owner, self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached_owner.is_some()
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut PropertyValue {
        &mut self.value
    }

    /// String value, failing clearly on any other variant
    pub fn as_str(&self) -> Result<&str> {
        match &self.value {
            PropertyValue::String(s) => Ok(s),
            other => Err(Error::ValueAccess {
                expected: "String",
                actual: other.variant_name(),
            }),
        }
    }

    /// Element value, failing clearly on any other variant
    pub fn as_element(&self) -> Result<ElementId> {
        match &self.value {
            PropertyValue::Element(id) => Ok(*id),
            other => Err(Error::ValueAccess {
                expected: "Element",
                actual: other.variant_name(),
            }),
        }
    }

    /// Extension value, failing clearly on any other variant
    pub fn as_extension(&self) -> Result<&MarkupExtension> {
        match &self.value {
            PropertyValue::Extension(ext) => Ok(ext),
            other => Err(Error::ValueAccess {
                expected: "Extension",
                actual: other.variant_name(),
            }),
        }
    }

    pub fn try_as_str(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn try_as_element(&self) -> Option<ElementId> {
        match &self.value {
            PropertyValue::Element(id) => Some(*id),
            _ => None,
        }
    }

    pub fn try_as_extension(&self) -> Option<&MarkupExtension> {
        match &self.value {
            PropertyValue::Extension(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn try_as_extension_mut(&mut self) -> Option<&mut MarkupExtension> {
        match &mut self.value {
            PropertyValue::Extension(ext) => Some(ext),
            _ => None,
        }
    }

    /// Replace a string value, advancing state to Transformed
    pub fn set_string(&mut self, value: impl Into<String>) {
        self.value = PropertyValue::String(value.into());
        self.state = self.state.advance(NodeState::Transformed);
    }

    pub fn has_string_value(&self) -> bool {
        matches!(self.value, PropertyValue::String(_))
    }

    pub fn has_extension_value(&self) -> bool {
        matches!(self.value, PropertyValue::Extension(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, value: PropertyValue) -> Property {
        Property::new(name, PropertyKind::Attribute, value, ElementId::from_index(0))
    }

    #[test]
    fn test_attached_owner_split() {
        let plain = sample("Content", PropertyValue::Null);
        assert_eq!(plain.name, "Content");
        assert_eq!(plain.attached_owner, None);
        assert_eq!(plain.qualified_name(), "Content");

        let attached = sample("Grid.Row", PropertyValue::String("1".to_string()));
        assert_eq!(attached.name, "Row");
        assert_eq!(attached.attached_owner.as_deref(), Some("Grid"));
        assert_eq!(attached.qualified_name(), "Grid.Row");
        assert!(attached.is_attached());
    }

    #[test]
    fn test_wrong_accessor_fails() {
        let prop = sample("Content", PropertyValue::String("hi".to_string()));
        assert_eq!(prop.as_str().unwrap(), "hi");
        let err = prop.as_element().unwrap_err();
        assert!(matches!(err, Error::ValueAccess { expected: "Element", actual: "String" }));
        assert_eq!(prop.try_as_element(), None);
    }

    #[test]
    fn test_set_string_advances_state() {
        let mut prop = sample("Visibility", PropertyValue::String("Visible".to_string()));
        assert_eq!(prop.state, NodeState::Unanalyzed);
        prop.set_string("True");
        assert_eq!(prop.state, NodeState::Transformed);
        assert_eq!(prop.as_str().unwrap(), "True");
    }
}
