//! The unified syntax-tree model
//!
//! A [`Document`] owns every element and property in two slab arenas
//! addressed by copyable ids; node identity is id equality. The external
//! parser builds the tree through the mutation API here (which keeps
//! parent back references consistent), enrichment fills in semantic
//! fields, and transformers rewrite names, values, and metadata in place.
//! The engine never deletes nodes — constructs with no target equivalent
//! are flagged through their metadata bags instead.

pub mod element;
pub mod extension;
pub mod metadata;
pub mod property;
pub mod traversal;

pub use element::{Element, NodeState};
pub use extension::{
    BindingDetail, ExtensionValue, MarkupExtension, RelativeSourceExpr, RelativeSourceMode,
    SemanticDetail,
};
pub use metadata::{keys as metadata_keys, MetadataBag};
pub use property::{Property, PropertyKind, PropertyValue};
pub use traversal::{Descendants, TreeWalk};

use crate::diagnostics::Location;
use crate::error::{Error, Result};
use crate::resolver::TypeInfo;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Identifies an element within its owning document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a property within its owning document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(u32);

impl PropertyId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named element recorded in the symbol table
#[derive(Debug, Clone)]
pub struct NamedElementSymbol {
    pub name: String,
    pub element: ElementId,
    pub type_name: String,
    pub location: Option<Location>,
}

/// A keyed resource recorded in the symbol table
#[derive(Debug, Clone)]
pub struct ResourceSymbol {
    pub key: String,
    pub element: ElementId,
    pub type_name: String,
    pub location: Option<Location>,
}

/// Per-document symbol table
///
/// Prefix mappings come from the parser; the named-element, resource, and
/// resolved-type entries are derived by enrichment from a full tree walk
/// and are only ever rebuilt wholesale.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    named_elements: HashMap<String, NamedElementSymbol>,
    resources: HashMap<String, ResourceSymbol>,
    resolved_types: HashMap<String, Arc<TypeInfo>>,
    /// prefix → namespace URI, ordered for deterministic iteration
    prefixes: BTreeMap<String, String>,
}

impl SymbolTable {
    /// Drop every derived entry; prefix mappings are parser data and stay
    pub fn clear_derived(&mut self) {
        self.named_elements.clear();
        self.resources.clear();
        self.resolved_types.clear();
    }

    pub fn insert_named_element(&mut self, symbol: NamedElementSymbol) {
        self.named_elements.insert(symbol.name.clone(), symbol);
    }

    pub fn insert_resource(&mut self, symbol: ResourceSymbol) {
        self.resources.insert(symbol.key.clone(), symbol);
    }

    pub fn named_element(&self, name: &str) -> Option<&NamedElementSymbol> {
        self.named_elements.get(name)
    }

    pub fn resource(&self, key: &str) -> Option<&ResourceSymbol> {
        self.resources.get(key)
    }

    pub fn named_element_count(&self) -> usize {
        self.named_elements.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn register_type(&mut self, type_info: Arc<TypeInfo>) {
        self.resolved_types
            .insert(type_info.full_name(), type_info);
    }

    pub fn resolved_type(&self, full_name: &str) -> Option<&Arc<TypeInfo>> {
        self.resolved_types.get(full_name)
    }

    /// Registered type lookup by local name; the lowest full name wins
    /// when namespaces collide, keeping the answer deterministic
    pub fn resolved_type_by_name(&self, local_name: &str) -> Option<&Arc<TypeInfo>> {
        self.resolved_types
            .iter()
            .filter(|(_, info)| info.name == local_name)
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, info)| info)
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Prefix mappings in stable (sorted) order
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn prefixes_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.prefixes
    }

    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }
}

/// One markup document: the tree arenas, symbol table, and metadata
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    properties: Vec<Property>,
    root: Option<ElementId>,
    pub symbols: SymbolTable,
    pub metadata: MetadataBag,
    /// Identifier of the source file this tree was parsed from
    pub source_path: Option<String>,
}

impl Document {
    pub fn new(source_path: Option<String>) -> Self {
        Self {
            source_path,
            ..Self::default()
        }
    }

    /// The root element, or `None` when parsing produced nothing
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Install the root element. Root replacement is not supported: the
    /// pipeline only ever changes subtree content.
    pub fn set_root(&mut self, id: ElementId) -> Result<()> {
        if self.root.is_some() {
            return Err(Error::Configuration {
                message: "document already has a root; root replacement is not supported"
                    .to_string(),
                source: None,
            });
        }
        self.check_element(id)?;
        self.root = Some(id);
        Ok(())
    }

    /// Create a detached element; attach it with [`Document::append_child`],
    /// [`Document::set_root`], or as a property value
    pub fn create_element(
        &mut self,
        type_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> ElementId {
        let id = ElementId::from_index(self.elements.len());
        self.elements.push(Element::new(type_name, namespace));
        id
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.index()]
    }

    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.index()]
    }

    pub fn property_mut(&mut self, id: PropertyId) -> &mut Property {
        &mut self.properties[id.index()]
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Append `child` to `parent`'s child list and point its back
    /// reference at `parent`. Fails if `child` already has an owner.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.check_element(parent)?;
        self.check_element(child)?;
        self.ensure_unowned(child)?;
        self.elements[child.index()].parent = Some(parent);
        self.elements[parent.index()].children.push(child);
        Ok(())
    }

    /// Add a property to `owner`. An `Owner.Property` name is split into
    /// the attached-owner qualifier and local name. When the value is an
    /// element, that element becomes owned by this property and its back
    /// reference points at `owner`.
    pub fn add_property(
        &mut self,
        owner: ElementId,
        name: impl Into<String>,
        kind: PropertyKind,
        value: PropertyValue,
    ) -> Result<PropertyId> {
        self.check_element(owner)?;
        if let PropertyValue::Element(value_element) = value {
            self.check_element(value_element)?;
            self.ensure_unowned(value_element)?;
            self.elements[value_element.index()].parent = Some(owner);
        }
        let id = PropertyId::from_index(self.properties.len());
        self.properties.push(Property::new(name, kind, value, owner));
        self.elements[owner.index()].properties.push(id);
        Ok(id)
    }

    /// Convenience for the common attribute-with-string-value case
    pub fn add_attribute(
        &mut self,
        owner: ElementId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<PropertyId> {
        self.add_property(
            owner,
            name,
            PropertyKind::Attribute,
            PropertyValue::String(value.into()),
        )
    }

    /// Snapshot of a node's traversable content: element-valued property
    /// contents first, then child elements
    pub fn content_of(&self, id: ElementId) -> Vec<ElementId> {
        let element = self.element(id);
        let mut content: Vec<ElementId> = element
            .properties
            .iter()
            .filter_map(|pid| self.property(*pid).try_as_element())
            .collect();
        content.extend(&element.children);
        content
    }

    /// Pre-order walk of the whole tree, root included
    pub fn descendants_and_self(&self) -> Descendants<'_> {
        Descendants::with_self(self, self.root)
    }

    /// Pre-order walk of the whole tree, root excluded
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::without_self(self, self.root)
    }

    /// Pre-order walk of the subtree under `id`, `id` included
    pub fn subtree(&self, id: ElementId) -> Descendants<'_> {
        Descendants::with_self(self, Some(id))
    }

    /// Find the property of `element` with the given local name
    pub fn find_property(&self, element: ElementId, name: &str) -> Option<PropertyId> {
        self.element(element)
            .properties
            .iter()
            .copied()
            .find(|pid| self.property(*pid).name == name)
    }

    fn check_element(&self, id: ElementId) -> Result<()> {
        if id.index() < self.elements.len() {
            Ok(())
        } else {
            Err(Error::StaleNode {
                message: format!("element id {:?} is not part of this document", id),
            })
        }
    }

    fn ensure_unowned(&self, id: ElementId) -> Result<()> {
        if self.elements[id.index()].parent.is_some() || self.root == Some(id) {
            return Err(Error::Configuration {
                message: format!(
                    "element {:?} ({}) already has an owner",
                    id,
                    self.elements[id.index()].type_name
                ),
                source: None,
            });
        }
        Ok(())
    }
}
