pub mod catalog;
pub mod table;
