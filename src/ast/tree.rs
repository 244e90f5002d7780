use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
};

use crate::{ast::{NodeKind, NodeTag}, QueryError, QueryResult};

static NEXT_TREE: AtomicUsize = AtomicUsize::new(0);

/// Index of a node, stamped with the [`Tree`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree: usize,
    index: usize,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    children: Vec<NodeId>,
}

/// Arena holding one statement tree. Nodes are only ever created as the new
/// last child of an existing node, so every node has exactly one parent and
/// the structure cannot form cycles or share subtrees. Ids issued by another
/// tree are rejected.
#[derive(Debug, Clone)]
pub struct Tree {
    id: usize,
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn new(root: NodeKind) -> Self {
        Self {
            id: NEXT_TREE.fetch_add(1, AtomicOrdering::Relaxed),
            nodes: vec![NodeData { kind: root, children: vec![] }],
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId { tree: self.id, index: 0 }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { tree: self, id: self.root_id() }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.tree == self.id && id.index < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> QueryResult<NodeRef<'_>> {
        if !self.contains(id) {
            return Err(QueryError::UnknownNode(id));
        }
        Ok(NodeRef { tree: self, id })
    }

    /// Appends a new node as the last child of `parent` and returns its id.
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> QueryResult<NodeId> {
        if !self.contains(parent) {
            return Err(QueryError::UnknownNode(parent));
        }
        Ok(self.append_owned(parent, kind))
    }

    /// Append under a parent this tree issued itself, such as a builder's
    /// own stack entries.
    pub(crate) fn append_owned(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        debug_assert!(self.contains(parent));
        let id = NodeId { tree: self.id, index: self.nodes.len() };
        self.nodes[parent.index].children.push(id);
        self.nodes.push(NodeData { kind, children: vec![] });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Borrowed view of one node. Equality is structural: kind, value and the
/// ordered child sequence, never node identity.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn kind(self) -> &'a NodeKind {
        &self.tree.nodes[self.id.index].kind
    }

    pub fn tag(self) -> NodeTag {
        self.kind().tag()
    }

    pub fn label(self) -> String {
        self.kind().label()
    }

    /// Children in insertion order.
    pub fn children(self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.nodes[self.id.index].children.iter().map(move |&id| NodeRef { tree, id })
    }

    pub fn child_count(self) -> usize {
        self.tree.nodes[self.id.index].children.len()
    }

    pub fn child(self, index: usize) -> Option<NodeRef<'a>> {
        self.children().nth(index)
    }

    /// The `k`-th (zero based) child whose kind is `tag`.
    pub fn nth_child_of(self, tag: NodeTag, k: usize) -> QueryResult<NodeRef<'a>> {
        self.children()
            .filter(|c| c.tag() == tag)
            .nth(k)
            .ok_or_else(|| QueryError::MissingChild {
                parent: self.label(),
                kind: tag.to_string(),
                index: k,
            })
    }

    pub fn has_child_of(self, tag: NodeTag) -> bool {
        self.children().any(|c| c.tag() == tag)
    }

    /// Value of an identifier node.
    pub fn identifier_value(self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Identifier(value) => Some(value.as_str()),
            _ => None,
        }
    }

    fn fmt_indented(self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.label(), indent = depth * 2)?;
        for child in self.children() {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.child_count() == other.child_count()
            && self.children().zip(other.children()).all(|(a, b)| a == b)
    }
}

impl Eq for NodeRef<'_> {}

/// Indented rendering of the subtree, one node label per line.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.child_count() == 0 {
            return write!(f, "{}", self.label());
        }
        f.debug_tuple(&self.label())
            .field(&self.children().collect::<Vec<_>>())
            .finish()
    }
}
