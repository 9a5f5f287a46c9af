pub mod adapter;
pub mod error;
pub mod row;
pub mod source;
