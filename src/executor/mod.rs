pub mod plan_executor;
pub use plan_executor::*;

#[cfg(test)]
mod _tests;
