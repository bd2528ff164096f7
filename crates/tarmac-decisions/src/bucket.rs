//! Durable object-store buckets a `DecisionRecord` is written to (§4.6,
//! §6.4). A sink may target more than one bucket (e.g. a primary archive
//! plus a secondary region mirror); each is attempted independently so a
//! failure in one never blocks the others.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DecisionsError;

/// One write target. `put` never retries internally — the sink decides
/// how to report a failed bucket, it does not mask it with its own backoff.
#[async_trait]
pub trait DecisionBucket: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: HashMap<String, String>) -> Result<(), DecisionsError>;
}

/// Stored object plus the metadata tags it was written with, for assertions
/// in tests.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

#[derive(Default)]
pub struct InMemoryBucket {
    objects: RwLock<HashMap<String, StoredObject>>,
    /// When set, the next `put` fails with this message instead of
    /// succeeding, to exercise the sink's partial-success path.
    fail_next: RwLock<Option<String>>,
}

impl InMemoryBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub async fn fail_next_write(&self, message: impl Into<String>) {
        *self.fail_next.write().await = Some(message.into());
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl DecisionBucket for InMemoryBucket {
    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: HashMap<String, String>) -> Result<(), DecisionsError> {
        if let Some(message) = self.fail_next.write().await.take() {
            return Err(DecisionsError::StoreTransport(message));
        }
        self.objects.write().await.insert(key.to_string(), StoredObject { bytes, metadata });
        Ok(())
    }
}
