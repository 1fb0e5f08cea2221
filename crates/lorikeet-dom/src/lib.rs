//! Read-only HTML fragment tree for the Lorikeet deserializer.
//!
//! This crate is the tree-walker boundary between the WHATWG-compliant
//! parser ([html5ever]) and the message deserializer. It exposes a minimal
//! capability set over a parsed fragment: enumerate root nodes, enumerate
//! children, test node kind, read a tag name, read a named attribute, read
//! literal text.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices, providing O(1)
//! child access without pointer-heavy structures or borrow checker issues.
//! Conversion from the parser's reference-counted DOM happens once, up
//! front; afterwards the tree is immutable.
//!
//! Only element and text nodes survive the conversion. Comments, doctypes
//! and processing instructions carry nothing a message renderer may show,
//! so they are dropped before the deserializer ever sees the tree.

use std::collections::HashMap;

use html5ever::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Map of attribute names (lowercase) to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the fragment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The synthetic fragment root is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// One node of the fragment tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is.
    pub kind: NodeKind,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// The kinds of node a fragment tree contains.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The synthetic root holding the fragment's top-level nodes.
    Fragment,
    /// An element node.
    Element(ElementData),
    /// A text node with its literal content.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, case-normalized to UPPERCASE.
    pub tag_name: String,
    /// The element's attribute list, names lowercase.
    pub attrs: AttributesMap,
}

/// An immutable, arena-backed view of one parsed HTML fragment.
///
/// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html)
/// is delegated to html5ever; whatever tree the parser reconstructs from
/// malformed input (auto-closed tags, implied elements) is what this view
/// reports. The fragment's root nodes are the children the parser placed
/// under `<body>`.
#[derive(Debug, Clone)]
pub struct FragmentTree {
    /// All nodes, indexed by [`NodeId`]. Index 0 is the fragment root.
    nodes: Vec<Node>,
}

impl FragmentTree {
    /// Parse a raw HTML fragment into a tree.
    ///
    /// Parsing in-memory input never fails: html5ever reinterprets rather
    /// than rejects malformed markup, and totally uninterpretable input
    /// simply yields an empty fragment.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        let mut tree = Self {
            nodes: vec![Node {
                kind: NodeKind::Fragment,
                children: Vec::new(),
            }],
        };
        if let Some(body) = find_body(&dom.document) {
            tree.convert_children(&body, NodeId::ROOT);
        }
        tree
    }

    /// The fragment's top-level nodes in document order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        self.children(NodeId::ROOT)
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// All children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The number of nodes in the tree, fragment root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing beyond the fragment root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get literal content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Read a named attribute from an element node.
    ///
    /// Returns `None` for text nodes, unknown IDs, or absent attributes.
    /// Attribute names are lowercase.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id)
            .and_then(|data| data.attrs.get(name))
            .map(String::as_str)
    }

    /// The flattened literal text of a node and all its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        if let NodeKind::Text(s) = &node.kind {
            out.push_str(s);
        }
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    /// Convert the children of an RcDom node into arena nodes under `parent`.
    fn convert_children(&mut self, rc_node: &Handle, parent: NodeId) {
        for rc_child in rc_node.children.borrow().iter() {
            match &rc_child.data {
                NodeData::Text { contents } => {
                    let id = self.alloc(NodeKind::Text(contents.borrow().to_string()));
                    self.nodes[parent.0].children.push(id);
                }
                NodeData::Element { name, attrs, .. } => {
                    let mut map = AttributesMap::new();
                    for attr in attrs.borrow().iter() {
                        let _ = map
                            .entry(attr.name.local.as_ref().to_owned())
                            .or_insert_with(|| attr.value.to_string());
                    }
                    let id = self.alloc(NodeKind::Element(ElementData {
                        tag_name: name.local.as_ref().to_ascii_uppercase(),
                        attrs: map,
                    }));
                    self.nodes[parent.0].children.push(id);
                    self.convert_children(rc_child, id);
                }
                // Comments, doctypes and processing instructions are not
                // representable in a message and carry no children.
                _ => {}
            }
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
        });
        id
    }
}

/// Find the `<body>` element html5ever reconstructs around every fragment.
fn find_body(document: &Handle) -> Option<Handle> {
    let html = find_child_element(document, "html")?;
    find_child_element(&html, "body")
}

fn find_child_element(node: &Handle, tag: &str) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| {
            matches!(&child.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
        })
        .cloned()
}
