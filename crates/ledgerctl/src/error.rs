use ledger::LedgerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CtlError>;

#[derive(Error, Debug)]
pub enum CtlError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Failed to render JSON: {0}")]
    Render(#[from] serde_json::Error),

    #[error("--database-url or DATABASE_URL is required for this command")]
    MissingDatabaseUrl,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
