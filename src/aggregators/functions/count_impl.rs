use crate::{aggregators::{Accumulator, AggregateImpl}, frame::Cell, QueryResult};

/// `count(x)`: number of elements in the argument column, nulls included.
/// `count(*)` sees one ordinal per member row, so it counts the group.
pub struct CountImpl;

impl AggregateImpl for CountImpl {
    fn name(&self) -> &'static str { "count" }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(CountAcc { cnt: 0 })
    }
}

struct CountAcc {
    cnt: i64,
}

impl Accumulator for CountAcc {
    fn update(&mut self, _value: &Cell) -> QueryResult<()> {
        self.cnt += 1;
        Ok(())
    }

    fn finalize(&self) -> Cell {
        Cell::Int(self.cnt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_element_including_nulls() {
        let values = vec![Cell::Int(1), Cell::Null, Cell::from("x")];
        assert_eq!(CountImpl.aggregate(&values).unwrap(), Cell::Int(3));
    }

    #[test]
    fn empty_column_counts_zero() {
        assert_eq!(CountImpl.aggregate(&[]).unwrap(), Cell::Int(0));
    }
}
