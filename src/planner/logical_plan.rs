use tracing::debug;

use crate::{ast::{NodeRef, NodeTag, Tree}, QueryResult};

/// A statement tree rooted at a `QUERY` node.
///
/// Plans come out of [`PlanBuilder`](crate::planner::PlanBuilder) unchecked;
/// callers run [`LogicalPlan::validate`] before handing one to an executor.
/// Equality compares the query trees structurally and ignores the plan name.
#[derive(Debug, Clone)]
pub struct LogicalPlan {
    name: String,
    tree: Tree,
}

impl LogicalPlan {
    pub(crate) fn from_tree(name: String, tree: Tree) -> Self {
        Self { name, tree }
    }

    /// Name of whoever built the plan (usually the visitor).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> NodeRef<'_> {
        self.tree.root()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn validate(&self) -> QueryResult<()> {
        debug!(plan = %self.name, nodes = self.tree.len(), "validating logical plan");
        self.query().validate()
    }

    /// First top-level clause of the given kind.
    pub fn clause(&self, tag: NodeTag) -> Option<NodeRef<'_>> {
        self.query().children().find(|c| c.tag() == tag)
    }

    pub fn select_items(&self) -> QueryResult<Vec<NodeRef<'_>>> {
        let select = self.query().nth_child_of(NodeTag::SelectClause, 0)?;
        Ok(select.children().collect())
    }

    pub fn where_clause(&self) -> Option<NodeRef<'_>> {
        self.clause(NodeTag::WhereClause)
    }

    pub fn group_by_clause(&self) -> Option<NodeRef<'_>> {
        self.clause(NodeTag::GroupByClause)
    }

    pub fn having_clause(&self) -> Option<NodeRef<'_>> {
        self.clause(NodeTag::HavingClause)
    }

    pub fn order_by_clause(&self) -> Option<NodeRef<'_>> {
        self.clause(NodeTag::OrderByClause)
    }

    /// Row limit, when the plan has a well-formed LIMIT clause.
    pub fn limit(&self) -> Option<u64> {
        self.clause(NodeTag::LimitClause)
            .and_then(|l| l.child(0))
            .and_then(|c| c.identifier_value())
            .and_then(|v| v.trim().parse().ok())
    }
}

impl PartialEq for LogicalPlan {
    fn eq(&self, other: &Self) -> bool {
        self.query() == other.query()
    }
}
