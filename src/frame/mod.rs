pub mod cell;
pub use cell::*;

pub mod schema;
pub use schema::*;

pub mod helpers;
pub use helpers::*;

pub mod data_frame;
pub use data_frame::*;

pub mod grouped_data_frame;
pub use grouped_data_frame::*;
