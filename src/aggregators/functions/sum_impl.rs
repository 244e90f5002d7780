use crate::{aggregators::{Accumulator, AggregateImpl}, frame::Cell, QueryError, QueryResult};

pub struct SumImpl;

impl AggregateImpl for SumImpl {
    fn name(&self) -> &'static str { "sum" }

    fn create_accumulator(&self) -> Box<dyn Accumulator> { Box::new(SumAcc::Empty) }
}

// Integer sums stay integral until a float shows up or i64 overflows.
enum SumAcc {
    Empty,
    Int(i64),
    Float(f64),
}

impl Accumulator for SumAcc {
    fn update(&mut self, value: &Cell) -> QueryResult<()> {
        let next = match (&*self, value) {
            (_, Cell::Null) => return Ok(()),
            (SumAcc::Empty, Cell::Int(i)) => SumAcc::Int(*i),
            (SumAcc::Empty, Cell::Float(f)) => SumAcc::Float(f.into_inner()),
            (SumAcc::Int(acc), Cell::Int(i)) => match acc.checked_add(*i) {
                Some(total) => SumAcc::Int(total),
                None => SumAcc::Float(*acc as f64 + *i as f64),
            },
            (SumAcc::Int(acc), Cell::Float(f)) => SumAcc::Float(*acc as f64 + f.into_inner()),
            (SumAcc::Float(acc), Cell::Int(i)) => SumAcc::Float(acc + *i as f64),
            (SumAcc::Float(acc), Cell::Float(f)) => SumAcc::Float(acc + f.into_inner()),
            (_, other @ Cell::Text(_)) => {
                return Err(QueryError::NonNumericAggregate {
                    function: "sum".into(),
                    value: other.to_string(),
                });
            }
        };
        *self = next;
        Ok(())
    }

    fn finalize(&self) -> Cell {
        match self {
            SumAcc::Empty => Cell::Null, // SQL SUM over all NULLs -> NULL
            SumAcc::Int(i) => Cell::Int(*i),
            SumAcc::Float(f) => Cell::float(*f),
        }
    }
}
