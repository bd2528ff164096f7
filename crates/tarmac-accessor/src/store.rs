//! The operational key/value store contract (§6.3) and an in-memory mock
//! used for tests and local development, grounded in the teacher's
//! `LegacyConnector` trait shape (`packages/gate/src/connectors/sdk.rs`).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AccessorError;

/// A single batch-get call's raw result: items keyed by the request key,
/// plus any keys the store did not have time to process (DynamoDB-style
/// `UnprocessedKeys`).
#[derive(Debug, Clone, Default)]
pub struct RawBatchResult {
    pub items: HashMap<String, serde_json::Value>,
    pub unprocessed_keys: Vec<String>,
}

/// The operational data store, read-only from the core's perspective.
#[async_trait]
pub trait OperationalStore: Send + Sync {
    /// Submit one batch request for `keys` against `table`. Implementations
    /// may return fewer items than requested along with the keys they
    /// could not service, exactly like a DynamoDB `BatchGetItem` response.
    async fn batch_get_item(&self, table: &str, keys: &[String]) -> Result<RawBatchResult, AccessorError>;
}

/// A simple in-memory store for tests, matching the teacher's
/// `MockConnector` pattern.
pub struct MockStore {
    tables: RwLock<HashMap<String, HashMap<String, serde_json::Value>>>,
    /// When set, this many keys per call are force-returned as unprocessed
    /// (simulating store throttling) before succeeding on the next attempt.
    throttle_remaining: RwLock<usize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            throttle_remaining: RwLock::new(0),
        }
    }

    pub async fn seed(&self, table: &str, key: &str, value: serde_json::Value) {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().insert(key.to_string(), value);
    }

    /// Force the next N keys (across calls) to come back unprocessed.
    pub async fn throttle_next(&self, n: usize) {
        *self.throttle_remaining.write().await = n;
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationalStore for MockStore {
    async fn batch_get_item(&self, table: &str, keys: &[String]) -> Result<RawBatchResult, AccessorError> {
        let tables = self.tables.read().await;
        let table_data = tables.get(table);

        let mut throttle = self.throttle_remaining.write().await;
        let mut result = RawBatchResult::default();

        for key in keys {
            if *throttle > 0 {
                *throttle -= 1;
                result.unprocessed_keys.push(key.clone());
                continue;
            }
            if let Some(value) = table_data.and_then(|t| t.get(key)) {
                result.items.insert(key.clone(), value.clone());
            }
            // Keys absent from the table are simply omitted, matching
            // DynamoDB semantics — they are not unprocessed, they don't exist.
        }

        Ok(result)
    }
}
