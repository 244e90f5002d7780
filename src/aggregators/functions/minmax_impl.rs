use std::cmp::Ordering;

use crate::{aggregators::{Accumulator, AggregateImpl}, frame::Cell, QueryError, QueryResult};

pub struct MinImpl;
pub struct MaxImpl;

impl AggregateImpl for MinImpl {
    fn name(&self) -> &'static str { "min" }
    fn create_accumulator(&self) -> Box<dyn Accumulator> { Box::new(ExtremaAcc::new_min()) }
}

impl AggregateImpl for MaxImpl {
    fn name(&self) -> &'static str { "max" }
    fn create_accumulator(&self) -> Box<dyn Accumulator> { Box::new(ExtremaAcc::new_max()) }
}

enum Mode { Min, Max }

struct ExtremaAcc {
    mode: Mode,
    current: Option<Cell>,
}

impl ExtremaAcc {
    fn new_min() -> Self { Self { mode: Mode::Min, current: None } }
    fn new_max() -> Self { Self { mode: Mode::Max, current: None } }

    fn function(&self) -> &'static str {
        match self.mode { Mode::Min => "min", Mode::Max => "max" }
    }

    // Numbers compare with each other, text with text; mixing is an error.
    fn better(&self, current: &Cell, candidate: &Cell) -> QueryResult<bool> {
        let ord = match (current, candidate) {
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                let (x, y) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (_, other) => {
                return Err(QueryError::NonNumericAggregate {
                    function: self.function().into(),
                    value: other.to_string(),
                });
            }
        };
        Ok(match self.mode { Mode::Min => ord.is_gt(), Mode::Max => ord.is_lt() })
    }
}

impl Accumulator for ExtremaAcc {
    fn update(&mut self, value: &Cell) -> QueryResult<()> {
        if value.is_null() { return Ok(()); }
        let replace = match &self.current {
            None => true,
            Some(cur) => self.better(cur, value)?,
        };
        if replace {
            self.current = Some(value.clone());
        }
        Ok(())
    }

    fn finalize(&self) -> Cell {
        self.current.clone().unwrap_or(Cell::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_over_numbers_skip_nulls() {
        let values = vec![Cell::Int(4), Cell::Null, Cell::float(1.5), Cell::Int(9)];
        assert_eq!(MinImpl.aggregate(&values).unwrap(), Cell::float(1.5));
        assert_eq!(MaxImpl.aggregate(&values).unwrap(), Cell::Int(9));
    }

    #[test]
    fn text_is_lexicographic() {
        let values = vec![Cell::from("b"), Cell::from("a"), Cell::from("c")];
        assert_eq!(MinImpl.aggregate(&values).unwrap(), Cell::from("a"));
        assert_eq!(MaxImpl.aggregate(&values).unwrap(), Cell::from("c"));
    }

    #[test]
    fn mixed_kinds_fail() {
        let values = vec![Cell::Int(1), Cell::from("a")];
        assert!(matches!(MaxImpl.aggregate(&values), Err(QueryError::NonNumericAggregate { .. })));
    }

    #[test]
    fn all_null_is_null() {
        assert_eq!(MinImpl.aggregate(&[Cell::Null]).unwrap(), Cell::Null);
    }
}
