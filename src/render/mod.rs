pub mod batch;
pub mod single;
pub mod table;
