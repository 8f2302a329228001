//! Document tree types.
//!
//! A parsed document is a flat arena of [`Node`]s indexed by [`NodeId`].
//! Every node keeps a non-owning back-reference to its parent, used only
//! for point lookups during rendering (tight-list detection,
//! image-inside-link detection, ordered-list counter lookup), never for
//! ownership or traversal order.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

/// Index of a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of a document node.
///
/// The enum is closed, so renderers match exhaustively and adding a
/// kind is a compile-time event. `Custom` carries kinds this crate does
/// not model; renderers traverse their children transparently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeKind {
    /// Root of a document.
    Document,
    /// Literal text run.
    Text { literal: String },
    Emphasis,
    Strong,
    Strikethrough,
    Paragraph,
    Heading { level: u8 },
    BlockQuote,
    /// Inline code span.
    Code { literal: String },
    /// Fenced or indented code block with its raw info string.
    FencedCode {
        literal: String,
        info: Option<String>,
    },
    BulletList { tight: bool },
    /// Ordered list. `start` is the running item counter: rendering an
    /// item reads the current value for its prefix and then advances
    /// it, so sibling items number sequentially through the shared
    /// cell. The counter stays advanced after a render pass; rebuild
    /// or re-parse the tree to render the same document again from its
    /// declared start.
    OrderedList { tight: bool, start: Cell<u64> },
    ListItem,
    ThematicBreak,
    SoftBreak,
    HardBreak,
    Link { destination: String },
    Image { destination: String },
    HtmlBlock { literal: String },
    HtmlInline { literal: String },
    /// A node kind this crate does not model. Children render
    /// transparently with no range.
    Custom { name: String },
}

/// A single node in the document arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Non-owning back-reference; `None` only for the root.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed document: a node arena rooted at a `Document` node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// An empty document holding only the root node.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // the root is always present
        self.nodes.len() <= 1
    }

    /// Append a new node as the last child of `parent`.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Replace `id`'s child list, re-parenting every child onto `id`.
    pub(crate) fn replace_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        for &child in &children {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes[id.index()].children = children;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
