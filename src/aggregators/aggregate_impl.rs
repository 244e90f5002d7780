use crate::{aggregators::Accumulator, frame::Cell, QueryResult};

/// Per-aggregate metadata + factory.
/// One instance is registered per function name.
/// It is stateless and thread-safe to share.
pub trait AggregateImpl: Send + Sync {
    /// Canonical lowercase function name ("count", "sum", ...).
    fn name(&self) -> &'static str;

    /// Create a fresh accumulator instance for one group.
    fn create_accumulator(&self) -> Box<dyn Accumulator>;

    /// Reduce a materialized column to one value.
    fn aggregate(&self, values: &[Cell]) -> QueryResult<Cell> {
        let mut acc = self.create_accumulator();
        for value in values {
            acc.update(value)?;
        }
        Ok(acc.finalize())
    }
}
