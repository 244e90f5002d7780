use crate::{frame::Cell, QueryResult};

/// The per-group state.
/// The grouped frame will:
///   1) materialize the function's argument column for one group
///   2) call `update(&mut self, &cell)` once per element, in member order
///   3) after the last element, call `finalize()`
pub trait Accumulator: Send {
    /// Update the running state with one element of the argument column.
    fn update(&mut self, value: &Cell) -> QueryResult<()>;

    /// Produce the aggregate value.
    fn finalize(&self) -> Cell;
}
