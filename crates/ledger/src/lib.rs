pub mod context;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use context::{DEFAULT_CALL_TIMEOUT, Ledger};
pub use database::Database;
pub use error::{LedgerError, Result};
pub use store::{LedgerStore, MemoryLedger};
