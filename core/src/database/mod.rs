pub mod batch_operations;
pub mod client;
pub mod sql_type_wrapper;
