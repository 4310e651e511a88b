use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{LedgerError, Result};
use crate::store::{LedgerStore, MemoryLedger};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle passed to every service function: the store plus the deadline
/// applied to each store call.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    call_timeout: Duration,
}

impl Ledger {
    pub fn new(store: Arc<dyn LedgerStore>, call_timeout: Duration) -> Self {
        Self {
            store,
            call_timeout,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryLedger::new()), DEFAULT_CALL_TIMEOUT)
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Runs one store call under the deadline. An elapsed deadline is a
    /// transient `Timeout`, never a success; the dropped call rolls back.
    pub async fn call<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = self.call_timeout.as_millis() as u64, "Store call timed out");
                Err(LedgerError::Timeout)
            }
        }
    }
}
