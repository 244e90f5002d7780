use crate::{aggregators::{Accumulator, AggregateImpl}, frame::Cell, QueryError, QueryResult};

pub struct AvgImpl;

impl AggregateImpl for AvgImpl {
    fn name(&self) -> &'static str { "avg" }
    fn create_accumulator(&self) -> Box<dyn Accumulator> { Box::new(AvgAcc { sum: 0.0, cnt: 0 }) }
}

struct AvgAcc { sum: f64, cnt: i64 }

impl Accumulator for AvgAcc {
    fn update(&mut self, value: &Cell) -> QueryResult<()> {
        match value {
            Cell::Null => {}
            Cell::Int(_) | Cell::Float(_) => {
                self.sum += value.as_f64().unwrap_or_default();
                self.cnt += 1;
            }
            Cell::Text(_) => return Err(QueryError::NonNumericAggregate {
                function: "avg".into(),
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    fn finalize(&self) -> Cell {
        if self.cnt == 0 { Cell::Null } else { Cell::float(self.sum / self.cnt as f64) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_non_null_numbers() {
        let values = vec![Cell::Int(1), Cell::Null, Cell::float(2.0)];
        assert_eq!(AvgImpl.aggregate(&values).unwrap(), Cell::float(1.5));
        assert_eq!(AvgImpl.aggregate(&[Cell::Null]).unwrap(), Cell::Null);
    }

    #[test]
    fn rejects_text() {
        assert!(AvgImpl.aggregate(&[Cell::from("a")]).is_err());
    }
}
