use crate::{
    ast::{ComparisonOperator, LogicalOperator, NodeKind, NodeRef, NodeTag},
    frame::Cell,
    QueryError, QueryResult,
};

pub struct Helpers;

impl Helpers {
    /// Removes one pair of matching quote characters around `literal`.
    pub fn strip_quotes<'a>(literal: &'a str, quotes: &[char]) -> &'a str {
        let mut chars = literal.chars();
        match (chars.next(), chars.next_back()) {
            (Some(first), Some(last)) if first == last && quotes.contains(&first) => {
                &literal[first.len_utf8()..literal.len() - last.len_utf8()]
            }
            _ => literal,
        }
    }

    /// Comparison rule shared by WHERE and HAVING. A null cell never passes,
    /// whatever the operator.
    pub fn satisfies(cell: &Cell, op: ComparisonOperator, literal: &str) -> QueryResult<bool> {
        if cell.is_null() {
            return Ok(false);
        }
        Ok(op.matches(cell.compare_literal(literal)?))
    }

    /// Splits a `FILTER_ITEM` into its operand, operator and raw literal.
    pub fn filter_parts(filter: NodeRef<'_>) -> QueryResult<(NodeRef<'_>, ComparisonOperator, &str)> {
        let operand = filter.child(0)
            .filter(|c| matches!(c.tag(), NodeTag::Column | NodeTag::Function))
            .ok_or_else(|| QueryError::validation(filter.label(), "a COLUMN or FUNCTION operand"))?;
        let comparator = filter.nth_child_of(NodeTag::Comparator, 0)?;
        let NodeKind::Comparator(op) = comparator.kind() else {
            return Err(QueryError::validation(filter.label(), "a COMPARATOR"));
        };
        let literal = filter.nth_child_of(NodeTag::Identifier, 0)?
            .identifier_value()
            .ok_or_else(|| QueryError::validation(filter.label(), "a literal IDENTIFIER"))?;
        Ok((operand, *op, literal))
    }

    /// Both operands of a `LOGICAL_OPERATION`, which must have exactly two.
    pub fn binary_operands(node: NodeRef<'_>, operator: LogicalOperator) -> QueryResult<(NodeRef<'_>, NodeRef<'_>)> {
        let mut operands = node.children();
        match (operands.len(), operands.next(), operands.next()) {
            (2, Some(left), Some(right)) => Ok((left, right)),
            (count, ..) => Err(QueryError::MalformedLogicalExpression {
                operator: operator.to_string(),
                operands: count,
            }),
        }
    }

    /// Name held by a `COLUMN` node.
    pub fn column_name(column: NodeRef<'_>) -> QueryResult<&str> {
        let ident = column.nth_child_of(NodeTag::Identifier, 0)?;
        ident.identifier_value()
            .ok_or_else(|| QueryError::validation(column.label(), "an IDENTIFIER child"))
    }

    /// Name of a `FUNCTION` node as written.
    pub fn function_name(function: NodeRef<'_>) -> QueryResult<&str> {
        let ident = function.nth_child_of(NodeTag::Identifier, 0)?;
        ident.identifier_value()
            .ok_or_else(|| QueryError::validation(function.label(), "a name IDENTIFIER"))
    }

    /// The single argument of a `FUNCTION` node: the child after its name.
    /// Extra arguments are rejected rather than ignored.
    pub fn function_argument(function: NodeRef<'_>) -> QueryResult<NodeRef<'_>> {
        let mut children = function.children();
        match (children.next(), children.next(), children.next()) {
            (Some(name), Some(arg), None)
                if name.tag() == NodeTag::Identifier
                    && matches!(arg.tag(), NodeTag::Column | NodeTag::Star | NodeTag::Function) => Ok(arg),
            _ => Err(QueryError::validation(
                function.label(),
                "a name IDENTIFIER followed by one COLUMN, STAR or FUNCTION argument",
            )),
        }
    }

    /// Output column name for an aggregate, e.g. `count(*)` or `sum(amount)`.
    /// Nested calls nest: `count(sum(amount))`.
    pub fn function_column_name(function: NodeRef<'_>) -> QueryResult<String> {
        let name = Self::function_name(function)?;
        let arg = Self::function_argument(function)?;
        let arg_name = match arg.kind() {
            NodeKind::Function => Self::function_column_name(arg)?,
            NodeKind::Column => Self::column_name(arg)?.to_string(),
            NodeKind::Star(None) => "*".to_string(),
            NodeKind::Star(Some(table)) => format!("{}.*", table),
            _ => arg.label(),
        };
        Ok(format!("{}({})", name, arg_name))
    }
}
