pub mod ledger;
pub mod repository;
pub mod summary;

pub use ledger::FinanceService;
pub use repository::*;
pub use summary::summarize;
