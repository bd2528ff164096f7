//! Checkpoint record shape (§3, §4.4).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentName;

/// Inline payload cap (P9): serialized state at or above this size is
/// off-loaded to the object store and only a reference is kept inline.
pub const INLINE_PAYLOAD_CAP_BYTES: usize = 350 * 1024;

/// Default time-to-live for a checkpoint record: 90 days forward.
pub const DEFAULT_TTL_SECONDS: i64 = 90 * 24 * 60 * 60;

/// Where a checkpoint's state payload actually lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CheckpointState {
    /// Payload serialized below the inline cap.
    Inline(serde_json::Value),
    /// Payload at or above the inline cap; only the object-store key is kept.
    Reference { object_key: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub thread: Uuid,
    pub checkpoint_id: String,
    pub timestamp: DateTime<Utc>,
    pub phase: String,
    pub agent_name: Option<AgentName>,
    pub state: CheckpointState,
    pub metadata: serde_json::Value,
    pub ttl_epoch: i64,
}

impl CheckpointRecord {
    pub fn partition_key(thread: Uuid) -> String {
        format!("THREAD#{thread}")
    }

    pub fn sort_key(checkpoint_id: &str, timestamp: DateTime<Utc>) -> String {
        format!("CHECKPOINT#{checkpoint_id}#{}", timestamp.to_rfc3339())
    }

    /// Object-store key for an off-loaded payload (§4.4).
    pub fn object_key(thread: Uuid, checkpoint_id: &str) -> String {
        format!("checkpoints/{thread}/{checkpoint_id}.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout_matches_spec_format() {
        let thread = Uuid::nil();
        assert_eq!(CheckpointRecord::partition_key(thread), format!("THREAD#{thread}"));
        assert_eq!(
            CheckpointRecord::object_key(thread, "phase1_complete"),
            format!("checkpoints/{thread}/phase1_complete.json")
        );
    }
}
