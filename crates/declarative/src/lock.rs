//! Named locks for shared remote side effects

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Hands out one lock per scope name.
///
/// Lazily creates a lock for each unique scope and returns the same
/// `Arc` for repeated lookups. The guarded value is `()`, so a poisoned
/// lock is simply taken over.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for `scope`.
    pub fn lock_for(&self, scope: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(scope.to_string()).or_default())
    }
}
