//! Arena-based document tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`] index,
//! which keeps the tree cheap to traverse and free of reference cycles. The
//! tree is built once by an external parser and then read-only for the
//! style and layout layers.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// Index of a node in the [`DomTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document root, always at index 0.
    pub const ROOT: Self = Self(0);
}

/// The kind and payload of a node.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The document root. Exactly one per tree, at [`NodeId::ROOT`].
    Document,
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A text node holding its character data.
    Text(String),
}

/// Tag name and attributes of an element node.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercased tag name (e.g. `div`, `img`).
    pub tag_name: String,
    /// Attribute map (e.g. `src`, `style`).
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// A single node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is.
    pub node_type: NodeType,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// Previous sibling in document order, if any.
    pub prev_sibling: Option<NodeId>,
}

/// The document tree arena.
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree containing only the document root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
                prev_sibling: None,
            }],
        }
    }

    /// The document root id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Allocate a new detached node and return its id.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
        });
        id
    }

    /// Append `child` as the last child of `parent`, wiring sibling links.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = prev;
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Parent of a node, if it has one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Children of a node in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Previous sibling of a node, if any.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.prev_sibling)
    }

    /// Element data if the node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match self.nodes.get(id.0).map(|n| &n.node_type) {
            Some(NodeType::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// Text content if the node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.0).map(|n| &n.node_type) {
            Some(NodeType::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Tag name if the node is an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// The root element of the document (first element child of the root).
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }

    /// Iterator over ancestors of a node, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Whether `id` is the given element or has one among its ancestors.
    #[must_use]
    pub fn in_element(&self, id: NodeId, tag: &str) -> bool {
        if self.tag_name(id) == Some(tag) {
            return true;
        }
        self.ancestors(id).any(|a| self.tag_name(a) == Some(tag))
    }
}

/// Iterator walking up the parent chain of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str) -> NodeType {
        NodeType::Element(ElementData {
            tag_name: tag.to_string(),
            attrs: AttributesMap::new(),
        })
    }

    #[test]
    fn test_append_child_wires_links() {
        let mut tree = DomTree::new();
        let body = tree.alloc(element("body"));
        let p1 = tree.alloc(element("p"));
        let p2 = tree.alloc(element("p"));
        tree.append_child(NodeId::ROOT, body);
        tree.append_child(body, p1);
        tree.append_child(body, p2);

        assert_eq!(tree.parent(p1), Some(body));
        assert_eq!(tree.prev_sibling(p2), Some(p1));
        assert_eq!(tree.prev_sibling(p1), None);
        assert_eq!(tree.children(body), &[p1, p2]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut tree = DomTree::new();
        let html = tree.alloc(element("html"));
        let body = tree.alloc(element("body"));
        let span = tree.alloc(element("span"));
        tree.append_child(NodeId::ROOT, html);
        tree.append_child(html, body);
        tree.append_child(body, span);

        let chain: Vec<NodeId> = tree.ancestors(span).collect();
        assert_eq!(chain, vec![body, html, NodeId::ROOT]);
    }

    #[test]
    fn test_in_element() {
        let mut tree = DomTree::new();
        let a = tree.alloc(element("a"));
        let text = tree.alloc(NodeType::Text("link".to_string()));
        tree.append_child(NodeId::ROOT, a);
        tree.append_child(a, text);

        assert!(tree.in_element(text, "a"));
        assert!(tree.in_element(a, "a"));
        assert!(!tree.in_element(a, "div"));
    }

    #[test]
    fn test_document_element() {
        let mut tree = DomTree::new();
        let html = tree.alloc(element("html"));
        tree.append_child(NodeId::ROOT, html);
        assert_eq!(tree.document_element(), Some(html));
    }
}
