//! Large-payload object store (§4.4, §6.4), used when a checkpoint's
//! serialized state is at or above `tarmac_core::INLINE_PAYLOAD_CAP_BYTES`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CheckpointError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), CheckpointError>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CheckpointError>;
}

/// In-memory object store for tests and the in-process checkpoint mode.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), CheckpointError> {
        self.objects.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CheckpointError> {
        Ok(self.objects.read().await.get(key).cloned())
    }
}
