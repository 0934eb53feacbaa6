//! Elements and per-node processing state

use crate::diagnostics::{Diagnostic, Location};
use crate::document::metadata::MetadataBag;
use crate::document::{ElementId, PropertyId};
use crate::resolver::TypeInfo;
use std::fmt;
use std::sync::Arc;

/// Processing state of an element or property
///
/// Transitions are monotonic within one pipeline run:
/// `Unanalyzed → Analyzed → Transformed`, with `Failed` reachable from any
/// state and sticky once entered. `Failed` marks one concern only —
/// unrelated transformers still act on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Unanalyzed,
    Analyzed,
    Transformed,
    Failed,
}

impl NodeState {
    fn rank(self) -> u8 {
        match self {
            NodeState::Unanalyzed => 0,
            NodeState::Analyzed => 1,
            NodeState::Transformed => 2,
            NodeState::Failed => 3,
        }
    }

    /// Move toward `next` without ever moving backward
    #[must_use]
    pub fn advance(self, next: NodeState) -> NodeState {
        if self == NodeState::Failed || next == NodeState::Failed {
            return NodeState::Failed;
        }
        if next.rank() > self.rank() {
            next
        } else {
            self
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Unanalyzed => write!(f, "Unanalyzed"),
            NodeState::Analyzed => write!(f, "Analyzed"),
            NodeState::Transformed => write!(f, "Transformed"),
            NodeState::Failed => write!(f, "Failed"),
        }
    }
}

/// One markup element
///
/// Ownership is one-directional: the parent's child list (or the document,
/// for the root) is the single owner, and `parent` is a non-owning back
/// reference kept consistent by the [`Document`](crate::Document) mutation
/// API.
#[derive(Debug, Clone)]
pub struct Element {
    /// Local type name as written (`Button`, `ListView`)
    pub type_name: String,
    /// Namespace URI the element's prefix resolved to
    pub namespace: String,
    pub(super) properties: Vec<PropertyId>,
    pub(super) children: Vec<ElementId>,
    pub(super) parent: Option<ElementId>,
    pub state: NodeState,
    /// Attached by the type-resolution pass; `None` when unresolvable
    pub resolved_type: Option<Arc<TypeInfo>>,
    pub metadata: MetadataBag,
    /// Findings local to this element
    pub diagnostics: Vec<Diagnostic>,
    /// `x:Name` identity, when declared
    pub name: Option<String>,
    /// `x:Key` under which this element is a resource, when declared
    pub resource_key: Option<String>,
    pub location: Option<Location>,
}

impl Element {
    pub(super) fn new(type_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: namespace.into(),
            properties: Vec::new(),
            children: Vec::new(),
            parent: None,
            state: NodeState::Unanalyzed,
            resolved_type: None,
            metadata: MetadataBag::new(),
            diagnostics: Vec::new(),
            name: None,
            resource_key: None,
            location: None,
        }
    }

    /// Property ids in declaration order
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    /// Child element ids in document order
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Non-owning back reference; `None` for the root
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Mark this element as having been rewritten
    pub fn mark_transformed(&mut self) {
        self.state = self.state.advance(NodeState::Transformed);
    }

    /// Mark one concern on this element as failed
    pub fn mark_failed(&mut self) {
        self.state = NodeState::Failed;
    }
}
