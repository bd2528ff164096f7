//! Bounded in-process audit trail for arbitration runs (§12 supplemented
//! feature), grounded in `packages/arbiter/src/audit.rs`'s `AuditLedger`
//! but narrowed to the one-line-per-run record this domain needs — this
//! is ambient observability, additional to (not a replacement for) the
//! Decision Record Sink in §4.6.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 1_000;

#[derive(Debug, Clone)]
pub struct ArbitrationAuditEntry {
    pub thread: Uuid,
    pub timestamp: DateTime<Utc>,
    pub recommended_solution_id: u8,
    pub conflict_count: usize,
    pub solution_count: usize,
}

/// A fixed-capacity ring buffer of the most recent arbitration runs.
pub struct ArbitrationAuditLog {
    capacity: usize,
    entries: RwLock<VecDeque<ArbitrationAuditEntry>>,
}

impl ArbitrationAuditLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    pub async fn record(&self, entry: ArbitrationAuditEntry) {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        tracing::info!(
            thread = %entry.thread,
            recommended_solution_id = entry.recommended_solution_id,
            conflicts = entry.conflict_count,
            solutions = entry.solution_count,
            "arbitration complete"
        );
        entries.push_back(entry);
    }

    pub async fn recent(&self, n: usize) -> Vec<ArbitrationAuditEntry> {
        let entries = self.entries.read().await;
        entries.iter().rev().take(n).cloned().collect()
    }
}

impl Default for ArbitrationAuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ring_buffer_evicts_oldest_past_capacity() {
        let log = ArbitrationAuditLog::new(2);
        for i in 0..3u8 {
            log.record(ArbitrationAuditEntry {
                thread: Uuid::new_v4(),
                timestamp: Utc::now(),
                recommended_solution_id: i + 1,
                conflict_count: 0,
                solution_count: 1,
            })
            .await;
        }
        let recent = log.recent(10).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].recommended_solution_id, 3);
        assert_eq!(recent[1].recommended_solution_id, 2);
    }
}
