use crate::{ast::{NodeKind, NodeRef, NodeTag}, QueryError, QueryResult};

/// Clause order inside a query; each clause may appear at most once.
const CLAUSE_ORDER: [NodeTag; 7] = [
    NodeTag::SelectClause,
    NodeTag::FromItem,
    NodeTag::WhereClause,
    NodeTag::GroupByClause,
    NodeTag::HavingClause,
    NodeTag::OrderByClause,
    NodeTag::LimitClause,
];

impl NodeRef<'_> {
    /// Depth-first shape check. Each node checks its own children first and
    /// then recurses; the first violation is returned.
    pub fn validate(self) -> QueryResult<()> {
        self.validate_shape()?;
        for child in self.children() {
            child.validate()?;
        }
        Ok(())
    }

    fn validate_shape(self) -> QueryResult<()> {
        let tags: Vec<NodeTag> = self.children().map(|c| c.tag()).collect();
        match self.kind() {
            NodeKind::Query => self.validate_query(&tags),
            NodeKind::SelectClause => self.non_empty_of(&tags, &[NodeTag::SelectItem], "one or more SELECT_ITEM children"),
            NodeKind::SelectItem => match tags.as_slice() {
                [NodeTag::Column | NodeTag::Function | NodeTag::Star] => Ok(()),
                [NodeTag::Column | NodeTag::Function | NodeTag::Star, NodeTag::Identifier] => Ok(()),
                _ => self.invalid("COLUMN, FUNCTION or STAR optionally followed by an alias IDENTIFIER", &tags),
            },
            NodeKind::Column | NodeKind::Table => match tags.as_slice() {
                [NodeTag::Identifier] => Ok(()),
                _ => self.invalid("a single IDENTIFIER child", &tags),
            },
            NodeKind::Function => match tags.as_slice() {
                [NodeTag::Identifier, NodeTag::Column | NodeTag::Star | NodeTag::Function] => Ok(()),
                _ => self.invalid("a name IDENTIFIER followed by one COLUMN, STAR or FUNCTION argument", &tags),
            },
            NodeKind::Identifier(_) | NodeKind::Star(_) | NodeKind::OrderingDirection(_) => match tags.as_slice() {
                [] => Ok(()),
                _ => self.invalid("no children", &tags),
            },
            NodeKind::Comparator(_) => match tags.as_slice() {
                [] | [NodeTag::Identifier] => Ok(()),
                _ => self.invalid("at most one operator IDENTIFIER", &tags),
            },
            NodeKind::FilterItem => match tags.as_slice() {
                [NodeTag::Column | NodeTag::Function, NodeTag::Comparator, NodeTag::Identifier] => Ok(()),
                _ => self.invalid("operand (COLUMN or FUNCTION), COMPARATOR and literal IDENTIFIER, in that order", &tags),
            },
            NodeKind::LogicalOperation(_) => {
                if tags.len() != 2 {
                    return Err(QueryError::validation(
                        self.label(),
                        format!("exactly 2 operand children, found {}", tags.len()),
                    ));
                }
                self.non_empty_of(&tags, &[NodeTag::FilterItem, NodeTag::LogicalOperation],
                    "FILTER_ITEM or LOGICAL_OPERATION operands")
            }
            NodeKind::WhereClause | NodeKind::HavingClause => match tags.as_slice() {
                [NodeTag::FilterItem | NodeTag::LogicalOperation] => Ok(()),
                _ => self.invalid("a single FILTER_ITEM or LOGICAL_OPERATION child", &tags),
            },
            NodeKind::FromItem => match tags.as_slice() {
                [NodeTag::Table] | [NodeTag::Table, NodeTag::Identifier] => Ok(()),
                _ => self.invalid("a TABLE optionally followed by an alias IDENTIFIER", &tags),
            },
            NodeKind::GroupByClause => self.non_empty_of(&tags, &[NodeTag::Column], "one or more COLUMN children"),
            NodeKind::OrderByClause => self.non_empty_of(&tags, &[NodeTag::OrderItem], "one or more ORDER_ITEM children"),
            NodeKind::OrderItem => match tags.as_slice() {
                [NodeTag::Column | NodeTag::Function] => Ok(()),
                [NodeTag::OrderingDirection, NodeTag::Column | NodeTag::Function] => Ok(()),
                _ => self.invalid("an optional ORDERING_DIRECTION followed by a COLUMN or FUNCTION", &tags),
            },
            NodeKind::LimitClause => {
                let count = match tags.as_slice() {
                    [NodeTag::Identifier] => self.child(0).and_then(|c| c.identifier_value()),
                    _ => None,
                };
                match count.map(|v| v.trim().parse::<u64>()) {
                    Some(Ok(_)) => Ok(()),
                    _ => self.invalid("a single non-negative integer IDENTIFIER", &tags),
                }
            }
        }
    }

    fn validate_query(self, tags: &[NodeTag]) -> QueryResult<()> {
        if tags.first() != Some(&NodeTag::SelectClause) {
            return self.invalid("a leading SELECT_CLAUSE", tags);
        }
        let mut last = 0;
        for (i, tag) in tags.iter().enumerate() {
            let pos = CLAUSE_ORDER.iter().position(|c| c == tag);
            match pos {
                Some(p) if i == 0 || p > last => last = p,
                _ => return self.invalid(
                    "clauses in SELECT, FROM, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT order, each at most once",
                    tags,
                ),
            }
        }
        Ok(())
    }

    fn non_empty_of(self, tags: &[NodeTag], allowed: &[NodeTag], expected: &str) -> QueryResult<()> {
        if !tags.is_empty() && tags.iter().all(|t| allowed.contains(t)) {
            Ok(())
        } else {
            self.invalid(expected, tags)
        }
    }

    fn invalid(self, expected: &str, found: &[NodeTag]) -> QueryResult<()> {
        let found: Vec<String> = found.iter().map(|t| t.to_string()).collect();
        Err(QueryError::validation(
            self.label(),
            format!("{}, found [{}]", expected, found.join(", ")),
        ))
    }
}
