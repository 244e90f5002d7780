use std::{cmp::Ordering, fmt};

use ordered_float::OrderedFloat;
use serde_json::{Number, Value};

use crate::{QueryError, QueryResult};

/// One table cell. Equality and hashing are per variant: `Int(1)` and
/// `Float(1.0)` are different group keys, and neither equals `Text("1")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    Null,
}

impl Cell {
    pub fn float(f: f64) -> Self {
        Cell::Float(OrderedFloat(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Int(_) | Cell::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    /// Orders this cell against a comparison literal.
    ///
    /// Numeric cells compare arithmetically, with the literal parsed as `f64`.
    /// Every other cell compares its text form lexicographically. `None` means
    /// the pair is unordered (NaN); null cells are the caller's concern.
    pub fn compare_literal(&self, literal: &str) -> QueryResult<Option<Ordering>> {
        match self.as_f64() {
            Some(cell) => {
                let value: f64 = literal.trim().parse()
                    .map_err(|_| QueryError::InvalidLiteral { literal: literal.to_string() })?;
                Ok(cell.partial_cmp(&value))
            }
            None => Ok(Some(self.to_string().as_str().cmp(literal))),
        }
    }

    /// Ledger rows arrive as JSON. Booleans and nested values have no cell
    /// variant of their own and are kept as text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map(Cell::float).unwrap_or(Cell::Null),
            },
            Value::String(s) => Cell::Text(s.clone()),
            Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Cell::Int(i) => Value::Number(Number::from(*i)),
            Cell::Float(f) => Number::from_f64(f.into_inner()).map(Value::Number).unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Null => Value::Null,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{}", v.into_inner()),
            Cell::Text(s) => f.write_str(s),
            Cell::Null => f.write_str("NULL"),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self { Cell::Int(value) }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self { Cell::Int(value as i64) }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self { Cell::Int(value as i64) }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self { Cell::float(value) }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self { Cell::Text(value.to_string()) }
}

impl From<String> for Cell {
    fn from(value: String) -> Self { Cell::Text(value) }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::cmp::Ordering::*;

    #[test]
    fn equality_never_crosses_variants() {
        assert_ne!(Cell::Int(1), Cell::float(1.0));
        assert_ne!(Cell::Int(1), Cell::from("1"));
        let keys: HashSet<Cell> = [Cell::Int(1), Cell::float(1.0), Cell::from("1"), Cell::Int(1)]
            .into_iter()
            .collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn numeric_cells_compare_arithmetically() {
        assert_eq!(Cell::Int(10).compare_literal("9").unwrap(), Some(Greater));
        assert_eq!(Cell::float(2.5).compare_literal("2.50").unwrap(), Some(Equal));
        assert_eq!(Cell::Int(3).compare_literal(" 4 ").unwrap(), Some(Less));
    }

    #[test]
    fn text_cells_compare_lexicographically() {
        assert_eq!(Cell::from("10").compare_literal("9").unwrap(), Some(Less));
        assert_eq!(Cell::from("abc").compare_literal("abc").unwrap(), Some(Equal));
    }

    #[test]
    fn numeric_cell_against_text_literal_is_an_error() {
        let err = Cell::Int(1).compare_literal("abc").unwrap_err();
        assert_eq!(err, QueryError::InvalidLiteral { literal: "abc".into() });
    }

    #[test]
    fn nan_is_unordered() {
        assert_eq!(Cell::float(f64::NAN).compare_literal("1").unwrap(), None);
    }

    #[test]
    fn json_conversion() {
        assert_eq!(Cell::from_json(&json!(7)), Cell::Int(7));
        assert_eq!(Cell::from_json(&json!(7.25)), Cell::float(7.25));
        assert_eq!(Cell::from_json(&json!("tx")), Cell::from("tx"));
        assert_eq!(Cell::from_json(&json!(null)), Cell::Null);
        assert_eq!(Cell::from_json(&json!(true)), Cell::from("true"));

        assert_eq!(Cell::Int(7).to_json(), json!(7));
        assert_eq!(Cell::float(0.5).to_json(), json!(0.5));
        assert_eq!(Cell::Null.to_json(), Value::Null);
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(Cell::from(None::<i64>), Cell::Null);
        assert_eq!(Cell::from(Some("x")), Cell::from("x"));
    }
}
