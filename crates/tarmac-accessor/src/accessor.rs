//! Batched reads with bounded windows and retry of unprocessed keys (§4.5).

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::error::AccessorError;
use crate::store::OperationalStore;

pub const DEFAULT_BATCH_SIZE: usize = 100;
const MAX_RETRIES: u32 = 3;

/// Result of a `batch_get` call: the items that were retrieved, plus any
/// keys still unresolved after the retry budget (§4.5 — these do not fail
/// the call, they are surfaced for the caller to act on if it opts in).
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub items: Vec<serde_json::Value>,
    pub unprocessed_keys: Vec<String>,
}

pub struct BatchedAccessor {
    store: Arc<dyn OperationalStore>,
}

impl BatchedAccessor {
    pub fn new(store: Arc<dyn OperationalStore>) -> Self {
        Self { store }
    }

    /// Read `keys` from `table` in windows of at most `batch_size`,
    /// retrying any residual unprocessed keys up to 3 times with backoff
    /// `0.1 * 2^attempt` seconds (§4.5, P10).
    pub async fn batch_get(
        &self,
        table: &str,
        keys: &[String],
        batch_size: Option<usize>,
    ) -> Result<BatchOutcome, AccessorError> {
        let batch_size = batch_size.unwrap_or(DEFAULT_BATCH_SIZE).max(1);
        let mut outcome = BatchOutcome::default();

        for window in keys.chunks(batch_size) {
            let mut pending: Vec<String> = window.to_vec();
            let mut attempt = 0u32;

            loop {
                if pending.is_empty() {
                    break;
                }

                let result = self.store.batch_get_item(table, &pending).await?;
                outcome.items.extend(result.items.into_values());

                if result.unprocessed_keys.is_empty() {
                    break;
                }
                if attempt >= MAX_RETRIES {
                    tracing::warn!(
                        table,
                        remaining = result.unprocessed_keys.len(),
                        "batch_get: giving up on unprocessed keys after retry budget"
                    );
                    outcome.unprocessed_keys.extend(result.unprocessed_keys);
                    break;
                }

                let backoff = backoff_duration(attempt);
                tracing::debug!(table, attempt, ?backoff, "batch_get: retrying unprocessed keys");
                tokio::time::sleep(backoff).await;

                pending = result.unprocessed_keys;
                attempt += 1;
            }
        }

        Ok(outcome)
    }

    /// Single-item read, kept for back-compat (§4.5): semantically a
    /// `batch_get` with one key.
    pub async fn get_item(&self, table: &str, key: &str) -> Result<Option<serde_json::Value>, AccessorError> {
        let outcome = self.batch_get(table, std::slice::from_ref(&key.to_string()), Some(1)).await?;
        Ok(outcome.items.into_iter().next())
    }
}

fn backoff_duration(attempt: u32) -> Duration {
    let base_secs = 0.1 * 2f64.powi(attempt as i32);
    let jitter_secs: f64 = rand::rng().random_range(0.0..(base_secs * 0.25));
    Duration::from_secs_f64(base_secs + jitter_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;

    #[tokio::test]
    async fn batch_get_splits_into_windows_of_batch_size() {
        let store = MockStore::new();
        let mut keys = Vec::new();
        for i in 0..250 {
            let key = format!("k{i}");
            store.seed("flights", &key, serde_json::json!({"i": i})).await;
            keys.push(key);
        }
        let accessor = BatchedAccessor::new(store.arc());

        let outcome = accessor.batch_get("flights", &keys, Some(100)).await.unwrap();
        assert_eq!(outcome.items.len(), 250);
        assert!(outcome.unprocessed_keys.is_empty());
    }

    #[tokio::test]
    async fn retries_unprocessed_keys_then_succeeds() {
        let store = MockStore::new();
        store.seed("flights", "k1", serde_json::json!({"ok": true})).await;
        // Throttle exactly one key on the first attempt; it should be
        // retried and succeed on the second attempt.
        store.throttle_next(1).await;

        let accessor = BatchedAccessor::new(store.arc());
        let outcome = accessor.batch_get("flights", &["k1".to_string()], None).await.unwrap();

        assert_eq!(outcome.items.len(), 1);
        assert!(outcome.unprocessed_keys.is_empty());
    }

    #[tokio::test]
    async fn residual_unprocessed_keys_reported_not_failed() {
        let store = MockStore::new();
        store.seed("flights", "k1", serde_json::json!({"ok": true})).await;
        // Throttle far more than the retry budget can clear.
        store.throttle_next(1000).await;

        let accessor = BatchedAccessor::new(store.arc());
        let outcome = accessor.batch_get("flights", &["k1".to_string()], None).await.unwrap();

        assert!(outcome.items.is_empty());
        assert_eq!(outcome.unprocessed_keys, vec!["k1".to_string()]);
    }

    #[tokio::test]
    async fn get_item_is_single_key_batch_get() {
        let store = MockStore::new();
        store.seed("flights", "k1", serde_json::json!({"ok": true})).await;
        let accessor = BatchedAccessor::new(store.arc());

        let item = accessor.get_item("flights", "k1").await.unwrap();
        assert_eq!(item, Some(serde_json::json!({"ok": true})));

        let missing = accessor.get_item("flights", "missing").await.unwrap();
        assert_eq!(missing, None);
    }
}
