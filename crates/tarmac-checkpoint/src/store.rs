//! `CheckpointStore`: size-routed, retrying, thread-scoped checkpoint
//! persistence (§4.4).
//!
//! Grounded in `packages/arbiter/src/locks.rs`'s conditional-retry loop and
//! `packages/synapse/src/state.rs`'s size-based routing between an inline
//! field and a referenced blob.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::warn;
use uuid::Uuid;

use tarmac_core::{CheckpointRecord, CheckpointState, INLINE_PAYLOAD_CAP_BYTES};

use crate::backend::{CheckpointBackend, InMemoryBackend, PutOutcome, StoredCheckpoint};
use crate::error::{CheckpointError, SaveOutcome};
use crate::object_store::{InMemoryObjectStore, ObjectStore};

/// Durable writes retry with backoff this many times before the store
/// falls back to an in-memory shadow and reports `SaveOutcome::Degraded`.
const MAX_WRITE_ATTEMPTS: u32 = 5;

/// Conditional-write conflicts on the same `(thread, checkpoint_id)` retry
/// this many times before surfacing `CheckpointError::Conflict`.
const MAX_CONFLICT_RETRIES: u32 = 3;

pub struct CheckpointStore {
    backend: Arc<dyn CheckpointBackend>,
    objects: Arc<dyn ObjectStore>,
    /// Shadow used only once durable writes are exhausted; never read from
    /// on the happy path.
    shadow: Arc<InMemoryBackend>,
    ttl_seconds: i64,
}

impl CheckpointStore {
    pub fn new(backend: Arc<dyn CheckpointBackend>, objects: Arc<dyn ObjectStore>) -> Self {
        Self {
            backend,
            objects,
            shadow: InMemoryBackend::arc(),
            ttl_seconds: tarmac_core::DEFAULT_TTL_SECONDS,
        }
    }

    /// A store with both roles served in-process, for tests and local runs.
    pub fn in_memory() -> Self {
        Self::new(InMemoryBackend::arc(), InMemoryObjectStore::arc())
    }

    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Persist a checkpoint, routing the payload inline or to the object
    /// store by size, and retrying the durable write with backoff before
    /// degrading to the in-memory shadow (§4.4, §7).
    pub async fn save(
        &self,
        thread: Uuid,
        checkpoint_id: &str,
        phase: &str,
        agent_name: Option<tarmac_core::AgentName>,
        payload: serde_json::Value,
        metadata: serde_json::Value,
    ) -> Result<SaveOutcome, CheckpointError> {
        let serialized = serde_json::to_vec(&payload).map_err(|e| CheckpointError::BackendTransport(e.to_string()))?;

        let state = if serialized.len() >= INLINE_PAYLOAD_CAP_BYTES {
            let object_key = CheckpointRecord::object_key(thread, checkpoint_id);
            self.objects
                .put(&object_key, serialized)
                .await
                .map_err(|e| CheckpointError::ObjectStoreTransport(e.to_string()))?;
            CheckpointState::Reference { object_key }
        } else {
            CheckpointState::Inline(payload)
        };

        let record = CheckpointRecord {
            thread,
            checkpoint_id: checkpoint_id.to_string(),
            timestamp: Utc::now(),
            phase: phase.to_string(),
            agent_name,
            state,
            metadata,
            ttl_epoch: Utc::now().timestamp() + self.ttl_seconds,
        };

        match self.write_with_retry(thread, checkpoint_id, record.clone()).await {
            Ok(()) => Ok(SaveOutcome::Ok),
            Err(_) => {
                warn!(
                    thread = %thread,
                    checkpoint_id,
                    "durable checkpoint write exhausted retries, degrading to in-memory shadow"
                );
                let _ = self.shadow.put_if_version(thread, checkpoint_id, record, None).await;
                Ok(SaveOutcome::Degraded)
            }
        }
    }

    /// Conditional write against the primary backend, retrying on
    /// conflict (reload current version, reattempt) up to
    /// `MAX_CONFLICT_RETRIES`, and on transport failure with exponential
    /// backoff up to `MAX_WRITE_ATTEMPTS`.
    async fn write_with_retry(&self, thread: Uuid, checkpoint_id: &str, record: CheckpointRecord) -> Result<(), CheckpointError> {
        let mut conflict_retries = 0u32;

        for attempt in 0..MAX_WRITE_ATTEMPTS {
            let expected_version = self.backend.get(thread, Some(checkpoint_id)).await?.map(|s| s.version);

            match self.backend.put_if_version(thread, checkpoint_id, record.clone(), expected_version).await {
                Ok(PutOutcome::Written { .. }) => return Ok(()),
                Ok(PutOutcome::Conflict { .. }) => {
                    conflict_retries += 1;
                    if conflict_retries >= MAX_CONFLICT_RETRIES {
                        return Err(CheckpointError::Conflict {
                            thread,
                            checkpoint_id: checkpoint_id.to_string(),
                            attempts: conflict_retries,
                        });
                    }
                    continue;
                }
                Err(err) => {
                    if attempt + 1 >= MAX_WRITE_ATTEMPTS {
                        return Err(err);
                    }
                    tokio::time::sleep(backoff_duration(attempt)).await;
                }
            }
        }

        Err(CheckpointError::BackendTransport("write retries exhausted".to_string()))
    }

    /// Load the most recent checkpoint for a thread, resolving any
    /// object-store reference back into an inline value.
    pub async fn load_latest(&self, thread: Uuid) -> Result<Option<CheckpointRecord>, CheckpointError> {
        let stored = match self.backend.get(thread, None).await? {
            Some(s) => s,
            None => return Ok(None),
        };
        self.resolve(stored).await.map(Some)
    }

    pub async fn load(&self, thread: Uuid, checkpoint_id: &str) -> Result<Option<CheckpointRecord>, CheckpointError> {
        let stored = match self.backend.get(thread, Some(checkpoint_id)).await? {
            Some(s) => s,
            None => return Ok(None),
        };
        self.resolve(stored).await.map(Some)
    }

    /// Every checkpoint recorded for a thread, ascending by timestamp.
    pub async fn list(&self, thread: Uuid) -> Result<Vec<CheckpointRecord>, CheckpointError> {
        let stored = self.backend.list(thread).await?;
        let mut resolved = Vec::with_capacity(stored.len());
        for s in stored {
            resolved.push(self.resolve(s).await?);
        }
        Ok(resolved)
    }

    async fn resolve(&self, stored: StoredCheckpoint) -> Result<CheckpointRecord, CheckpointError> {
        let mut record = stored.record;
        if let CheckpointState::Reference { object_key } = &record.state {
            let bytes = self
                .objects
                .get(object_key)
                .await
                .map_err(|e| CheckpointError::ObjectStoreTransport(e.to_string()))?
                .ok_or_else(|| CheckpointError::NotFound {
                    thread: record.thread,
                    detail: format!(": referenced object {object_key} missing"),
                })?;
            let value: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|e| CheckpointError::ObjectStoreTransport(e.to_string()))?;
            record.state = CheckpointState::Inline(value);
        }
        Ok(record)
    }

    /// Sweep expired checkpoints from both the primary backend and the
    /// shadow (§12 supplemented feature).
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> Result<usize, CheckpointError> {
        let primary = self.backend.prune_expired(now).await?;
        let shadow = self.shadow.prune_expired(now).await?;
        Ok(primary + shadow)
    }
}

fn backoff_duration(attempt: u32) -> Duration {
    let base = 0.1 * 2f64.powi(attempt as i32);
    let jitter = rand::rng().random_range(0.0..(base * 0.25));
    Duration::from_secs_f64(base + jitter)
}
