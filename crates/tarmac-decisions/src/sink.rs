//! `DecisionRecordSink` (§4.6): the selection endpoint's backing logic.
//! Grounded in the teacher's bounded audit ledger (`packages/arbiter/src/audit.rs`)
//! for the record shape and in its multi-destination write pattern from the
//! privacy/governance registry for "attempt every target, report per-target
//! status rather than failing fast".

use std::collections::HashMap;
use std::sync::Arc;

use tarmac_core::DecisionRecord;

use crate::bucket::DecisionBucket;
use crate::error::DecisionsError;
use crate::solution_store::SolutionStore;

/// Per-bucket outcome of a `record_selection` write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketStatus {
    Written,
    Failed(String),
}

/// Overall outcome: `Success` iff every configured bucket accepted the
/// write, `PartialSuccess` if at least one did and at least one didn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    Success,
    PartialSuccess,
}

#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub status: SelectionStatus,
    pub bucket_status: HashMap<String, BucketStatus>,
    pub record: DecisionRecord,
}

pub struct DecisionRecordSink {
    solutions: Arc<dyn SolutionStore>,
    buckets: Vec<(String, Arc<dyn DecisionBucket>)>,
}

impl DecisionRecordSink {
    pub fn new(solutions: Arc<dyn SolutionStore>) -> Self {
        Self {
            solutions,
            buckets: Vec::new(),
        }
    }

    /// Register a named durable write target. Order of registration has no
    /// bearing on outcome: every bucket is attempted regardless of whether
    /// an earlier one failed.
    pub fn with_bucket(mut self, name: impl Into<String>, bucket: Arc<dyn DecisionBucket>) -> Self {
        self.buckets.push((name.into(), bucket));
        self
    }

    pub fn solutions(&self) -> &Arc<dyn SolutionStore> {
        &self.solutions
    }

    /// §4.6 `record_selection`.
    pub async fn record_selection(
        &self,
        disruption_id: &str,
        selected_solution_id: u8,
        rationale: Option<String>,
    ) -> Result<SelectionOutcome, DecisionsError> {
        let stored = self
            .solutions
            .get(disruption_id)
            .await?
            .ok_or_else(|| DecisionsError::NotFound(disruption_id.to_string()))?;

        let available: Vec<u8> = stored.output.solution_options.iter().map(|s| s.solution_id).collect();
        if !available.contains(&selected_solution_id) {
            return Err(DecisionsError::InvalidSelection {
                disruption_id: disruption_id.to_string(),
                selected: selected_solution_id,
                available,
            });
        }

        let record = DecisionRecord::new(
            disruption_id,
            stored.flight_number,
            stored.disruption_type,
            stored.disruption_severity,
            stored.agent_responses,
            stored.output.solution_options,
            stored.output.recommended_solution_id,
            selected_solution_id,
            rationale,
        );

        let key = record.object_key();
        let metadata = tags(&record);
        let bytes = serde_json::to_vec(&record).map_err(|e| DecisionsError::StoreTransport(e.to_string()))?;

        let mut bucket_status = HashMap::with_capacity(self.buckets.len());
        for (name, bucket) in &self.buckets {
            match bucket.put(&key, bytes.clone(), metadata.clone()).await {
                Ok(()) => {
                    bucket_status.insert(name.clone(), BucketStatus::Written);
                }
                Err(err) => {
                    tracing::warn!(bucket = name, disruption_id, error = %err, "decision record bucket write failed");
                    bucket_status.insert(name.clone(), BucketStatus::Failed(err.to_string()));
                }
            }
        }

        let status = if bucket_status.values().all(|s| *s == BucketStatus::Written) {
            SelectionStatus::Success
        } else {
            SelectionStatus::PartialSuccess
        };

        Ok(SelectionOutcome {
            status,
            bucket_status,
            record,
        })
    }
}

fn tags(record: &DecisionRecord) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    if let Some(flight_number) = &record.flight_number {
        tags.insert("flight_number".to_string(), flight_number.clone());
    }
    if let Some(disruption_type) = &record.disruption_type {
        tags.insert("disruption_type".to_string(), disruption_type.clone());
    }
    tags.insert("selected_solution".to_string(), record.selected_solution_id.to_string());
    tags.insert("human_override".to_string(), record.human_override.to_string());
    tags
}
