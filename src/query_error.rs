use std::fmt::Display;

use crate::ast::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// A node does not have the shape its kind requires.
    PlanValidation { node: String, expected: String },
    /// `nth_child_of` asked for a child the node does not have.
    MissingChild { parent: String, kind: String, index: usize },
    /// A node id that was not issued by the tree it was used with.
    UnknownNode(NodeId),
    ColumnNotFound(String),
    GroupingConstraint(String),
    UnknownFunction(String),
    MalformedLogicalExpression { operator: String, operands: usize },
    NonNumericAggregate { function: String, value: String },
    InvalidLiteral { literal: String },
    InvalidFrame(String),
    BuilderUnderflow,
    Config(String),
}

impl QueryError {
    pub fn validation(node: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::PlanValidation { node: node.into(), expected: expected.into() }
    }

    pub fn err<T>(self) -> Result<T, QueryError> {
        Err(self)
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::PlanValidation { node, expected } =>
                write!(f, "Invalid {} node: expected {}", node, expected),
            QueryError::MissingChild { parent, kind, index } =>
                write!(f, "{} has no {} child at position {}", parent, kind, index),
            QueryError::UnknownNode(id) =>
                write!(f, "Node {} does not belong to this plan", id.index()),
            QueryError::ColumnNotFound(name) =>
                write!(f, "Column {} doesn't exist in table", name),
            QueryError::GroupingConstraint(name) =>
                write!(f, "Column {} must appear in GROUP BY clause", name),
            QueryError::UnknownFunction(name) =>
                write!(f, "Unidentified function: {}", name),
            QueryError::MalformedLogicalExpression { operator, operands } =>
                write!(f, "Logical operation {} should have two boolean expressions, found {}", operator, operands),
            QueryError::NonNumericAggregate { function, value } =>
                write!(f, "{} got non numeric value: {}", function, value),
            QueryError::InvalidLiteral { literal } =>
                write!(f, "Literal '{}' cannot be compared with a numeric value", literal),
            QueryError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            QueryError::BuilderUnderflow => write!(f, "Plan builder cannot ascend above the query root"),
            QueryError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for QueryError {}

pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_item() {
        assert_eq!(
            QueryError::ColumnNotFound("amount".into()).to_string(),
            "Column amount doesn't exist in table"
        );
        assert_eq!(
            QueryError::GroupingConstraint("sender".into()).to_string(),
            "Column sender must appear in GROUP BY clause"
        );
        assert_eq!(
            QueryError::UnknownFunction("median".into()).to_string(),
            "Unidentified function: median"
        );
        let e = QueryError::validation("LOGICAL_OPERATION:AND", "exactly 2 operands, found 3");
        assert_eq!(e.to_string(), "Invalid LOGICAL_OPERATION:AND node: expected exactly 2 operands, found 3");
    }
}
