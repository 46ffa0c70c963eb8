pub mod auth;
pub mod cash_box;
pub mod catalog;
pub mod receivable;
pub mod reports;
