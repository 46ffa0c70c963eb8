pub mod auth;
pub mod cash_box;
pub mod closure;
pub mod metrics;
pub mod receivable;
pub mod report_pdf;
pub mod summary;
pub mod totals;
