pub mod user_repo;
pub use user_repo::UserRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod cash_box_repo;
pub use cash_box_repo::CashBoxRepository;
pub mod receivable_repo;
pub use receivable_repo::ReceivableRepository;
