use std::fmt;

use crate::ast::{ComparisonOperator, Direction, LogicalOperator};

/// Every node kind a logical plan can hold. Kinds that carry a value
/// (identifiers, operators, star qualifiers) keep it inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Query,
    SelectClause,
    SelectItem,
    Column,
    Identifier(String),
    /// `*` or `t.*`
    Star(Option<String>),
    Function,
    Comparator(ComparisonOperator),
    FilterItem,
    LogicalOperation(LogicalOperator),
    FromItem,
    Table,
    WhereClause,
    GroupByClause,
    HavingClause,
    OrderByClause,
    OrderItem,
    OrderingDirection(Direction),
    LimitClause,
}

/// Value-free discriminant of [`NodeKind`], used for typed child lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Query,
    SelectClause,
    SelectItem,
    Column,
    Identifier,
    Star,
    Function,
    Comparator,
    FilterItem,
    LogicalOperation,
    FromItem,
    Table,
    WhereClause,
    GroupByClause,
    HavingClause,
    OrderByClause,
    OrderItem,
    OrderingDirection,
    LimitClause,
}

impl NodeKind {
    pub fn identifier(value: impl Into<String>) -> Self {
        NodeKind::Identifier(value.into())
    }

    pub fn star() -> Self {
        NodeKind::Star(None)
    }

    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Query => NodeTag::Query,
            NodeKind::SelectClause => NodeTag::SelectClause,
            NodeKind::SelectItem => NodeTag::SelectItem,
            NodeKind::Column => NodeTag::Column,
            NodeKind::Identifier(_) => NodeTag::Identifier,
            NodeKind::Star(_) => NodeTag::Star,
            NodeKind::Function => NodeTag::Function,
            NodeKind::Comparator(_) => NodeTag::Comparator,
            NodeKind::FilterItem => NodeTag::FilterItem,
            NodeKind::LogicalOperation(_) => NodeTag::LogicalOperation,
            NodeKind::FromItem => NodeTag::FromItem,
            NodeKind::Table => NodeTag::Table,
            NodeKind::WhereClause => NodeTag::WhereClause,
            NodeKind::GroupByClause => NodeTag::GroupByClause,
            NodeKind::HavingClause => NodeTag::HavingClause,
            NodeKind::OrderByClause => NodeTag::OrderByClause,
            NodeKind::OrderItem => NodeTag::OrderItem,
            NodeKind::OrderingDirection(_) => NodeTag::OrderingDirection,
            NodeKind::LimitClause => NodeTag::LimitClause,
        }
    }

    /// Node label: the tag name, qualified by the inline value when there is one.
    /// Identifiers are labelled by their value alone.
    pub fn label(&self) -> String {
        match self {
            NodeKind::Identifier(value) => value.clone(),
            NodeKind::Star(None) => "STAR:*".to_string(),
            NodeKind::Star(Some(table)) => format!("STAR:{}.*", table),
            NodeKind::Comparator(op) => format!("{}:{}", self.tag(), op),
            NodeKind::LogicalOperation(op) => format!("{}:{}", self.tag(), op),
            NodeKind::OrderingDirection(dir) => format!("{}:{}", self.tag(), dir),
            _ => self.tag().to_string(),
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeTag::Query => "QUERY",
            NodeTag::SelectClause => "SELECT_CLAUSE",
            NodeTag::SelectItem => "SELECT_ITEM",
            NodeTag::Column => "COLUMN",
            NodeTag::Identifier => "IDENTIFIER",
            NodeTag::Star => "STAR",
            NodeTag::Function => "FUNCTION",
            NodeTag::Comparator => "COMPARATOR",
            NodeTag::FilterItem => "FILTER_ITEM",
            NodeTag::LogicalOperation => "LOGICAL_OPERATION",
            NodeTag::FromItem => "FROM_ITEM",
            NodeTag::Table => "TABLE",
            NodeTag::WhereClause => "WHERE_CLAUSE",
            NodeTag::GroupByClause => "GROUP_BY_CLAUSE",
            NodeTag::HavingClause => "HAVING_CLAUSE",
            NodeTag::OrderByClause => "ORDER_BY_CLAUSE",
            NodeTag::OrderItem => "ORDER_ITEM",
            NodeTag::OrderingDirection => "ORDERING_DIRECTION",
            NodeTag::LimitClause => "LIMIT_CLAUSE",
        };
        f.write_str(name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
