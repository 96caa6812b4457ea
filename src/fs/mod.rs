pub mod listing;
pub mod operations;
