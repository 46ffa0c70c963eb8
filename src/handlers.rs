pub mod auth;
pub mod cash_boxes;
pub mod catalog;
pub mod closures;
pub mod expenses;
pub mod receivables;
pub mod reports;
