use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Per-request memoization cache.
///
/// Create one per request (or render), pass it by reference to every data
/// helper, and drop it when the request ends. Within one scope each key is
/// resolved at most once; concurrent callers for the same key wait on the
/// same in-flight initialization. Failed initializations are not stored, so
/// the next caller runs its own request.
#[derive(Debug, Default)]
pub struct RequestScope {
    entries: Mutex<HashMap<String, Arc<OnceCell<Value>>>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn memoize<F, Fut>(&self, key: &str, init: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        if let Some(value) = cell.get() {
            tracing::debug!("Request scope hit for {}", key);
            return Ok(value.clone());
        }

        let value = cell.get_or_try_init(init).await?;
        Ok(value.clone())
    }

    /// Number of keys holding a resolved value.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }
}
