pub mod operators;
pub use operators::*;

pub mod node_kind;
pub use node_kind::*;

pub mod tree;
pub use tree::*;

pub mod validation;
