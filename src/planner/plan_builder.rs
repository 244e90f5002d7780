use tracing::trace;

use crate::{
    ast::{ComparisonOperator, NodeId, NodeKind, Tree},
    planner::LogicalPlan,
    QueryError, QueryResult,
};

/// Incremental plan construction for a recursive-descent visitor.
///
/// The builder owns an explicit stack of open parents. `enter` appends a node
/// under the current parent and makes it current; `leave` closes it again.
/// `add` appends without moving the cursor. The query root is always at the
/// bottom of the stack and can never be closed.
pub struct PlanBuilder {
    name: String,
    tree: Tree,
    stack: Vec<NodeId>,
}

impl PlanBuilder {
    pub fn new(name: &str) -> Self {
        let tree = Tree::new(NodeKind::Query);
        let root = tree.root_id();
        Self { name: name.to_string(), tree, stack: vec![root] }
    }

    /// Node that `add` and `enter` attach to.
    pub fn current(&self) -> NodeId {
        // the root is never popped
        self.stack[self.stack.len() - 1]
    }

    /// Number of open parents above the query root.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn add(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current();
        self.attach(parent, kind)
    }

    /// Appends under an explicit parent, leaving the cursor alone. The parent
    /// must have been issued by this builder.
    pub fn add_to(&mut self, parent: NodeId, kind: NodeKind) -> QueryResult<NodeId> {
        if !self.tree.contains(parent) {
            return Err(QueryError::UnknownNode(parent));
        }
        Ok(self.attach(parent, kind))
    }

    // stack entries and ids returned by `attach` always belong to `self.tree`
    fn attach(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        trace!(parent = parent.index(), kind = %kind, "append node");
        self.tree.append_owned(parent, kind)
    }

    pub fn enter(&mut self, kind: NodeKind) -> NodeId {
        let id = self.add(kind);
        self.stack.push(id);
        id
    }

    pub fn leave(&mut self) -> QueryResult<NodeId> {
        if self.stack.len() == 1 {
            return QueryError::BuilderUnderflow.err();
        }
        self.stack.pop().ok_or(QueryError::BuilderUnderflow)
    }

    /// `COLUMN(name)` under the current node.
    pub fn column(&mut self, name: &str) -> NodeId {
        let column = self.add(NodeKind::Column);
        self.attach(column, NodeKind::identifier(name));
        column
    }

    pub fn literal(&mut self, value: &str) -> NodeId {
        self.add(NodeKind::identifier(value))
    }

    pub fn star(&mut self) -> NodeId {
        self.add(NodeKind::star())
    }

    /// Comparator node carrying its operator symbol as an identifier child.
    pub fn comparator(&mut self, op: ComparisonOperator) -> NodeId {
        let cmp = self.add(NodeKind::Comparator(op));
        self.attach(cmp, NodeKind::identifier(op.symbol()));
        cmp
    }

    /// Opens a `FUNCTION` node with its name; the argument goes next.
    pub fn enter_function(&mut self, name: &str) -> NodeId {
        let function = self.enter(NodeKind::Function);
        self.add(NodeKind::identifier(name));
        function
    }

    /// Hands over the plan without validating it.
    pub fn finish(self) -> LogicalPlan {
        LogicalPlan::from_tree(self.name, self.tree)
    }

    pub fn build(self) -> QueryResult<LogicalPlan> {
        let plan = self.finish();
        plan.validate()?;
        Ok(plan)
    }
}
