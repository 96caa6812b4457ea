pub mod listing;
pub mod search_bar;
