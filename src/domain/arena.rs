use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

/// Name of the synthetic node holding all top-level entries.
pub const ROOT_NAME: &str = "root";

/// Node in the arena-based document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Identifier matching `[A-Za-z0-9-.]+`
    pub name: String,
    /// Scalar payload, absent unless set by `name:text`, a pair or `:text` blocks
    pub data: Option<String>,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in document order
    pub children: Vec<Index>,
}

/// Parsed BML document.
///
/// All nodes live in one generational arena; children are index lists and the
/// parent link is a plain index, so the tree has no ownership cycles.
/// Mutation is crate-private: once `parse` hands a document out it is frozen.
#[derive(Debug)]
pub struct Document {
    arena: Arena<Node>,
    root: Index,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node {
            name: ROOT_NAME.to_string(),
            data: None,
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    #[instrument(level = "trace", skip(self))]
    pub(crate) fn append(&mut self, parent: Index, name: &str, data: Option<String>) -> Index {
        let node_idx = self.arena.insert(Node {
            name: name.to_string(),
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        node_idx
    }

    /// Append a block segment: the first one sets the data, later ones join with `\n`.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn append_block(&mut self, idx: Index, segment: &str) {
        if let Some(node) = self.arena.get_mut(idx) {
            match node.data.as_mut() {
                Some(data) => {
                    data.push('\n');
                    data.push_str(segment);
                }
                None => node.data = Some(segment.to_string()),
            }
        }
    }

    /// Parent of `idx`; the root is its own upper bound.
    pub(crate) fn parent_or_root(&self, idx: Index) -> Index {
        self.arena
            .get(idx)
            .and_then(|node| node.parent)
            .unwrap_or(self.root)
    }

    pub fn get_node(&self, idx: Index) -> Option<&Node> {
        self.arena.get(idx)
    }

    pub fn root_index(&self) -> Index {
        self.root
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            idx: self.root,
        }
    }

    /// Number of nodes, the synthetic root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().children().next().is_none()
    }

    pub fn path(&self, name: &str) -> Option<NodeRef<'_>> {
        self.root().path(name)
    }

    pub fn path_chain(&self, name: &str, more: &[&str]) -> Option<NodeRef<'_>> {
        self.root().path_chain(name, more)
    }

    pub fn elements(&self, name: &str) -> Vec<NodeRef<'_>> {
        self.root().elements(name)
    }

    /// Pre-order walk over every node below the root, in document order.
    pub fn iter(&self) -> DocumentIterator<'_> {
        DocumentIterator::new(self)
    }

    /// Longest root-to-leaf chain, the root counted as one level.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

/// Read-only handle on one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    idx: Index,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        // Indices handed out by a document always refer to live nodes: nothing is removed.
        &self.doc.arena[self.idx]
    }

    pub fn index(&self) -> Index {
        self.idx
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    pub fn data(&self) -> Option<&'a str> {
        self.node().data.as_deref()
    }

    /// Scalar data, or `""` when absent.
    pub fn text(&self) -> &'a str {
        self.data().unwrap_or("")
    }

    pub fn is_root(&self) -> bool {
        self.idx == self.doc.root
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|idx| NodeRef { doc: self.doc, idx })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        self.node()
            .children
            .iter()
            .map(move |&idx| NodeRef { doc, idx })
    }

    /// First child named `name`, in document order.
    pub fn path(&self, name: &str) -> Option<NodeRef<'a>> {
        self.children().find(|child| child.name() == name)
    }

    /// Follow `name` then each of `more`, always through the first match.
    pub fn path_chain(&self, name: &str, more: &[&str]) -> Option<NodeRef<'a>> {
        let mut current = self.path(name)?;
        for name in more {
            current = current.path(name)?;
        }
        Some(current)
    }

    /// All children named `name`, in document order.
    pub fn elements(&self, name: &str) -> Vec<NodeRef<'a>> {
        self.children().filter(|child| child.name() == name).collect()
    }

    /// Dotted names from the first top-level ancestor down to this node.
    pub fn qualified_name(&self) -> String {
        let mut names = Vec::new();
        let mut current = Some(*self);
        while let Some(node) = current {
            if node.is_root() {
                break;
            }
            names.push(node.name());
            current = node.parent();
        }
        names.reverse();
        names.join(".")
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("name", &self.name())
            .field("data", &self.data())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            Some(data) => write!(f, "{}: {}", self.name(), data.escape_debug()),
            None => write!(f, "{}", self.name()),
        }
    }
}

pub struct DocumentIterator<'a> {
    doc: &'a Document,
    stack: Vec<Index>,
}

impl<'a> DocumentIterator<'a> {
    fn new(doc: &'a Document) -> Self {
        let stack = doc
            .get_node(doc.root)
            .map(|root| root.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Self { doc, stack }
    }
}

impl<'a> Iterator for DocumentIterator<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.doc.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(NodeRef {
            doc: self.doc,
            idx: current_idx,
        })
    }
}
