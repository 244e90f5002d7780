pub mod ast;
pub use ast::{NodeKind, NodeRef, NodeTag, Tree};

pub mod planner;
pub use planner::{LogicalPlan, PlanBuilder};

pub mod frame;
pub use frame::{Cell, DataFrame, GroupedDataFrame};

pub mod aggregators;
pub use aggregators::AggregateRegistry;

pub mod executor;
pub use executor::{Executor, PlanExecutor};

pub mod config;
pub use config::Config;

pub mod query_error;
pub use query_error::{QueryError, QueryResult};
