use std::{cmp::Ordering, fmt};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ComparisonOperator {
    /// Applies the operator to an already computed ordering of `cell` against `literal`.
    /// An unordered pair (NaN) only satisfies `Neq`.
    pub fn matches(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (ComparisonOperator::Neq, None) => true,
            (_, None) => false,
            (ComparisonOperator::Eq, Some(o)) => o.is_eq(),
            (ComparisonOperator::Neq, Some(o)) => o.is_ne(),
            (ComparisonOperator::Gt, Some(o)) => o.is_gt(),
            (ComparisonOperator::Gte, Some(o)) => o.is_ge(),
            (ComparisonOperator::Lt, Some(o)) => o.is_lt(),
            (ComparisonOperator::Lte, Some(o)) => o.is_le(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Neq => "<>",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
        }
    }
}

impl TryFrom<&str> for ComparisonOperator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "=" | "==" => Ok(ComparisonOperator::Eq),
            "!=" | "<>" => Ok(ComparisonOperator::Neq),
            ">" => Ok(ComparisonOperator::Gt),
            ">=" => Ok(ComparisonOperator::Gte),
            "<" => Ok(ComparisonOperator::Lt),
            "<=" => Ok(ComparisonOperator::Lte),
            _ => Err(format!("Invalid comparison operator: '{}'", value)),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComparisonOperator::Eq => "EQ",
            ComparisonOperator::Neq => "NEQ",
            ComparisonOperator::Gt => "GT",
            ComparisonOperator::Gte => "GTE",
            ComparisonOperator::Lt => "LT",
            ComparisonOperator::Lte => "LTE",
        };
        f.write_str(name)
    }
}

impl fmt::Debug for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComparisonOperator({})", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("AND"),
            LogicalOperator::Or => f.write_str("OR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering::*;

    #[test]
    fn parses_symbols() {
        assert_eq!(ComparisonOperator::try_from("=").unwrap(), ComparisonOperator::Eq);
        assert_eq!(ComparisonOperator::try_from("<>").unwrap(), ComparisonOperator::Neq);
        assert_eq!(ComparisonOperator::try_from("!=").unwrap(), ComparisonOperator::Neq);
        assert_eq!(ComparisonOperator::try_from(" >= ").unwrap(), ComparisonOperator::Gte);
        assert!(ComparisonOperator::try_from("LIKE").is_err());
    }

    #[test]
    fn matches_is_directional() {
        assert!(ComparisonOperator::Gt.matches(Some(Greater)));
        assert!(!ComparisonOperator::Gt.matches(Some(Equal)));
        assert!(ComparisonOperator::Gte.matches(Some(Equal)));
        assert!(ComparisonOperator::Lt.matches(Some(Less)));
        assert!(ComparisonOperator::Lte.matches(Some(Equal)));
        assert!(!ComparisonOperator::Lte.matches(Some(Greater)));
        assert!(ComparisonOperator::Eq.matches(Some(Equal)));
        assert!(ComparisonOperator::Neq.matches(Some(Less)));
    }

    #[test]
    fn unordered_only_satisfies_neq() {
        assert!(ComparisonOperator::Neq.matches(None));
        for op in [ComparisonOperator::Eq, ComparisonOperator::Gt, ComparisonOperator::Gte,
                   ComparisonOperator::Lt, ComparisonOperator::Lte] {
            assert!(!op.matches(None), "{op} should reject an unordered pair");
        }
    }
}
