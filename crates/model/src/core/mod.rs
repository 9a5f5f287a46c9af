pub mod data_type;
pub mod datetime;
pub mod value;
