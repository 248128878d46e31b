//! Per-symbol serialization of order workflow runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

/// Table of async locks keyed by exchange symbol.
///
/// An entry only the table still references is idle and gets dropped on the
/// next acquire, so the table holds at most the symbols with a run in flight
/// plus the one being acquired.
#[derive(Debug, Default)]
pub(crate) struct SymbolLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SymbolLocks {
    /// Wait until no other run holds `symbol`, then hold it until the guard drops.
    pub(crate) async fn acquire(&self, symbol: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(symbol.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
