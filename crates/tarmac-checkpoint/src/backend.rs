//! The keyed-record backend contract (§4.4) and its two implementations:
//! an in-process store for dev/test, and a durable store for production,
//! both behind `CheckpointBackend`.
//!
//! Grounded in `packages/synapse/src/state.rs`'s `StateStore` (async
//! `RwLock<HashMap<..>>` with a version counter per entry) and
//! `packages/arbiter/src/locks.rs`'s conditional-acquire pattern.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use tarmac_core::CheckpointRecord;

use crate::error::CheckpointError;

/// A record as stored by the backend, carrying the version used for
/// optimistic conditional writes.
#[derive(Debug, Clone)]
pub struct StoredCheckpoint {
    pub record: CheckpointRecord,
    pub version: u64,
}

/// Result of a conditional write attempt.
pub enum PutOutcome {
    Written { version: u64 },
    /// The record at this key has moved on to a different version than
    /// the caller expected.
    Conflict { current_version: u64 },
}

#[async_trait]
pub trait CheckpointBackend: Send + Sync {
    /// Write `record` under `(thread, checkpoint_id)`, succeeding only if
    /// the currently stored version matches `expected_version` (`None`
    /// means "must not already exist").
    async fn put_if_version(
        &self,
        thread: Uuid,
        checkpoint_id: &str,
        record: CheckpointRecord,
        expected_version: Option<u64>,
    ) -> Result<PutOutcome, CheckpointError>;

    /// Fetch the most recent checkpoint for a thread, or a specific one by id.
    async fn get(&self, thread: Uuid, checkpoint_id: Option<&str>) -> Result<Option<StoredCheckpoint>, CheckpointError>;

    /// All checkpoints for a thread, ascending by timestamp (§4.4).
    async fn list(&self, thread: Uuid) -> Result<Vec<StoredCheckpoint>, CheckpointError>;

    /// Remove any checkpoint whose `ttl_epoch` is at or before `now`.
    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<usize, CheckpointError>;

    /// Human-readable name of the active mode, logged at startup (§4.4).
    fn mode_name(&self) -> &'static str;
}

/// In-process backend: used for tests and local/dev runs. Also the target
/// of the in-memory shadow fallback on durable-write exhaustion (§4.4).
pub struct InMemoryBackend {
    // keyed by (thread, checkpoint_id) -> latest stored record + version
    records: RwLock<HashMap<(Uuid, String), StoredCheckpoint>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckpointBackend for InMemoryBackend {
    async fn put_if_version(
        &self,
        thread: Uuid,
        checkpoint_id: &str,
        record: CheckpointRecord,
        expected_version: Option<u64>,
    ) -> Result<PutOutcome, CheckpointError> {
        let mut records = self.records.write().await;
        let key = (thread, checkpoint_id.to_string());

        let current_version = records.get(&key).map(|s| s.version);
        if current_version != expected_version {
            return Ok(PutOutcome::Conflict {
                current_version: current_version.unwrap_or(0),
            });
        }

        let next_version = current_version.unwrap_or(0) + 1;
        records.insert(
            key,
            StoredCheckpoint {
                record,
                version: next_version,
            },
        );
        Ok(PutOutcome::Written { version: next_version })
    }

    async fn get(&self, thread: Uuid, checkpoint_id: Option<&str>) -> Result<Option<StoredCheckpoint>, CheckpointError> {
        let records = self.records.read().await;
        match checkpoint_id {
            Some(id) => Ok(records.get(&(thread, id.to_string())).cloned()),
            None => Ok(records
                .iter()
                .filter(|((t, _), _)| *t == thread)
                .max_by_key(|(_, s)| s.record.timestamp)
                .map(|(_, s)| s.clone())),
        }
    }

    async fn list(&self, thread: Uuid) -> Result<Vec<StoredCheckpoint>, CheckpointError> {
        let records = self.records.read().await;
        let mut matching: Vec<StoredCheckpoint> = records
            .iter()
            .filter(|((t, _), _)| *t == thread)
            .map(|(_, s)| s.clone())
            .collect();
        matching.sort_by_key(|s| s.record.timestamp);
        Ok(matching)
    }

    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<usize, CheckpointError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, s| s.record.ttl_epoch > now.timestamp());
        Ok(before - records.len())
    }

    fn mode_name(&self) -> &'static str {
        "in-process"
    }
}
