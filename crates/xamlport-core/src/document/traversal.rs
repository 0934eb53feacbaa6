//! Tree traversal
//!
//! Both traversal forms are pre-order and snapshot each node's content list
//! (element-valued property contents first, then child elements) at the
//! moment the node is visited, before descending. A mutation elsewhere in
//! the tree during the same walk therefore neither duplicates nor skips
//! nodes: a sibling's children are read only when the sibling itself is
//! visited.
//!
//! [`Descendants`] borrows the document and suits read-only walks.
//! [`TreeWalk`] holds no borrow — the document is passed to each `next`
//! call — so callers may mutate the tree between steps, which is how every
//! transformer walk works.

use crate::document::{Document, ElementId};

/// Borrow-free pre-order cursor
///
/// ```ignore
/// let mut walk = TreeWalk::new(root);
/// while let Some(id) = walk.next(&document) {
///     // mutate `document` freely here
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TreeWalk {
    stack: Vec<ElementId>,
}

impl TreeWalk {
    /// Walk the subtree rooted at `start`, including `start` itself
    pub fn new(start: ElementId) -> Self {
        Self { stack: vec![start] }
    }

    /// Walk a whole document from its root; empty when there is none
    pub fn from_document(document: &Document) -> Self {
        Self {
            stack: document.root().into_iter().collect(),
        }
    }

    /// Next node in pre-order, or `None` when the walk is exhausted
    pub fn next(&mut self, document: &Document) -> Option<ElementId> {
        let id = self.stack.pop()?;
        // Snapshot this node's content before descending; reversed so the
        // first entry is popped first.
        let mut content = document.content_of(id);
        content.reverse();
        self.stack.extend(content);
        Some(id)
    }
}

/// Borrowing pre-order iterator over a subtree
pub struct Descendants<'a> {
    document: &'a Document,
    walk: TreeWalk,
}

impl<'a> Descendants<'a> {
    pub(super) fn with_self(document: &'a Document, start: Option<ElementId>) -> Self {
        Self {
            document,
            walk: TreeWalk {
                stack: start.into_iter().collect(),
            },
        }
    }

    pub(super) fn without_self(document: &'a Document, start: Option<ElementId>) -> Self {
        let stack = match start {
            Some(id) => {
                let mut content = document.content_of(id);
                content.reverse();
                content
            }
            None => Vec::new(),
        };
        Self {
            document,
            walk: TreeWalk { stack },
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        self.walk.next(self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, PropertyKind, PropertyValue};

    /// Build:
    /// ```text
    /// Window
    /// ├── (Window.Resources) SolidColorBrush
    /// ├── StackPanel
    /// │   ├── Button
    /// │   └── TextBlock
    /// └── Border
    /// ```
    fn sample_document() -> (Document, Vec<ElementId>) {
        let mut doc = Document::new(Some("Main.xaml".to_string()));
        let window = doc.create_element("Window", "wpf");
        doc.set_root(window).unwrap();

        let brush = doc.create_element("SolidColorBrush", "wpf");
        doc.add_property(window, "Window.Resources", PropertyKind::PropertyElement, PropertyValue::Element(brush))
            .unwrap();

        let panel = doc.create_element("StackPanel", "wpf");
        let button = doc.create_element("Button", "wpf");
        let text = doc.create_element("TextBlock", "wpf");
        let border = doc.create_element("Border", "wpf");
        doc.append_child(window, panel).unwrap();
        doc.append_child(panel, button).unwrap();
        doc.append_child(panel, text).unwrap();
        doc.append_child(window, border).unwrap();

        (doc, vec![window, brush, panel, button, text, border])
    }

    #[test]
    fn test_preorder_covers_property_elements_and_children() {
        let (doc, ids) = sample_document();
        let visited: Vec<ElementId> = doc.descendants_and_self().collect();
        assert_eq!(visited, ids);
    }

    #[test]
    fn test_descendants_excludes_self() {
        let (doc, ids) = sample_document();
        let visited: Vec<ElementId> = doc.descendants().collect();
        assert_eq!(visited, ids[1..].to_vec());
    }

    #[test]
    fn test_walk_is_restartable() {
        let (doc, _) = sample_document();
        let first: Vec<ElementId> = doc.descendants_and_self().collect();
        let second: Vec<ElementId> = doc.descendants_and_self().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mutation_of_unvisited_sibling_is_seen() {
        let (mut doc, ids) = sample_document();
        let border = ids[5];

        let mut walk = TreeWalk::from_document(&doc);
        let mut visited = Vec::new();
        while let Some(id) = walk.next(&doc) {
            visited.push(id);
            // While standing on the first child subtree, grow the last
            // sibling: the walk must still visit the new node exactly once.
            if doc.element(id).type_name == "Button" {
                let late = doc.create_element("CheckBox", "wpf");
                doc.append_child(border, late).unwrap();
            }
        }

        let names: Vec<&str> = visited
            .iter()
            .map(|id| doc.element(*id).type_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Window", "SolidColorBrush", "StackPanel", "Button", "TextBlock", "Border", "CheckBox"]
        );
    }

    #[test]
    fn test_mutation_of_snapshotted_list_does_not_duplicate() {
        let (mut doc, ids) = sample_document();
        let panel = ids[2];

        let mut walk = TreeWalk::new(panel);
        let mut visited = Vec::new();
        while let Some(id) = walk.next(&doc) {
            visited.push(id);
            // Appending under the already-snapshotted panel after we have
            // descended into it must not re-enter the panel's list.
            if doc.element(id).type_name == "TextBlock" {
                let late = doc.create_element("Separator", "wpf");
                doc.append_child(panel, late).unwrap();
            }
        }

        let names: Vec<&str> = visited
            .iter()
            .map(|id| doc.element(*id).type_name.as_str())
            .collect();
        assert_eq!(names, vec!["StackPanel", "Button", "TextBlock"]);
    }

    #[test]
    fn test_empty_document_walk() {
        let doc = Document::new(None);
        assert_eq!(doc.descendants_and_self().count(), 0);
        let mut walk = TreeWalk::from_document(&doc);
        assert_eq!(walk.next(&doc), None);
    }
}
