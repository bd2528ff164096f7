//! The Orchestrator (§4.1): drives a disruption through Phase 1 (Initial),
//! Phase 2 (Revision), and Phase 3 (Arbitration), checkpointing at every
//! phase boundary and enforcing the all-safety-unavailable failure policy.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use uuid::Uuid;

use tarmac_accessor::BatchedAccessor;
use tarmac_analyzers::AnalyzerRegistry;
use tarmac_arbiter::Arbitrator;
use tarmac_checkpoint::CheckpointStore;
use tarmac_core::{AnalyzerPhase, ArbitratorOutput, Collation, DisruptionInput, TarmacError};
use tarmac_gateway::ModelGateway;

use crate::error::OrchestratorError;
use crate::phase::run_phase;

pub const CHECKPOINT_START: &str = "start";
pub const CHECKPOINT_PHASE1: &str = "phase1_complete";
pub const CHECKPOINT_PHASE2: &str = "phase2_complete";
pub const CHECKPOINT_PHASE3: &str = "phase3_complete";
pub const CHECKPOINT_END: &str = "end";
pub const CHECKPOINT_UNAVAILABLE: &str = "all_safety_unavailable";

/// Result of a complete (or resumed) run (§4.1 "Public contract").
#[derive(Debug, Clone)]
pub struct OrchestrationResult {
    pub thread: Uuid,
    pub output: ArbitratorOutput,
    pub collation1: Collation,
    pub collation2: Collation,
    pub phase1_duration_seconds: f64,
    pub phase2_duration_seconds: f64,
    pub phase3_duration_seconds: f64,
}

/// What `resume` reconstructs from the checkpoint store for a thread that
/// has not run to completion (§4.1 "Recovery", §12 supplemented feature).
#[derive(Debug, Clone, Default)]
pub struct ResumeState {
    pub latest_checkpoint_id: String,
    pub collation1: Option<Collation>,
    pub collation2: Option<Collation>,
}

pub struct Orchestrator {
    registry: AnalyzerRegistry,
    checkpoints: Arc<CheckpointStore>,
    accessor: Arc<BatchedAccessor>,
    gateway: Arc<dyn ModelGateway>,
    arbitrator: Arbitrator,
}

impl Orchestrator {
    pub fn new(
        registry: AnalyzerRegistry,
        checkpoints: Arc<CheckpointStore>,
        accessor: Arc<BatchedAccessor>,
        gateway: Arc<dyn ModelGateway>,
        arbitrator: Arbitrator,
    ) -> Self {
        Self {
            registry,
            checkpoints,
            accessor,
            gateway,
            arbitrator,
        }
    }

    /// Handle onto the checkpoint store backing this orchestrator, for
    /// callers (e.g. the façade's `status` operation) that need to inspect
    /// checkpoint progress without going through `resume`.
    pub fn checkpoint_store(&self) -> &Arc<CheckpointStore> {
        &self.checkpoints
    }

    /// §4.1 `handle_disruption`. A `continuation_id` that parses as a UUID
    /// with existing checkpoints resumes that thread (skipping any phase
    /// already checkpointed); otherwise a fresh thread is minted.
    pub async fn handle_disruption(
        &self,
        raw_prompt: &str,
        continuation_id: Option<String>,
    ) -> Result<OrchestrationResult, TarmacError> {
        let disruption = DisruptionInput::new(raw_prompt, continuation_id.clone())?;

        let thread = match continuation_id.as_deref().and_then(|id| Uuid::parse_str(id).ok()) {
            Some(existing) => existing,
            None => Uuid::new_v4(),
        };

        let resumed = self.resume(thread).await.map_err(OrchestratorError::from)?;

        self.checkpoints
            .save(thread, CHECKPOINT_START, "start", None, json!({ "prompt": disruption.prompt }), json!({}))
            .await
            .map_err(OrchestratorError::from)?;

        let phase1_started = Instant::now();
        let collation1 = match resumed.as_ref().and_then(|r| r.collation1.clone()) {
            Some(existing) => existing,
            None => {
                let collation = run_phase(
                    AnalyzerPhase::Initial,
                    thread,
                    &disruption.prompt,
                    None,
                    &self.registry,
                    Arc::clone(&self.gateway),
                    Arc::clone(&self.accessor),
                )
                .await;
                self.checkpoints
                    .save(
                        thread,
                        CHECKPOINT_PHASE1,
                        "initial",
                        None,
                        serde_json::to_value(&collation).map_err(|e| TarmacError::Internal(e.to_string()))?,
                        json!({}),
                    )
                    .await
                    .map_err(OrchestratorError::from)?;
                collation
            }
        };
        let phase1_duration_seconds = phase1_started.elapsed().as_secs_f64();

        let phase2_started = Instant::now();
        let collation2 = match resumed.as_ref().and_then(|r| r.collation2.clone()) {
            Some(existing) => existing,
            None => {
                let collation = run_phase(
                    AnalyzerPhase::Revision,
                    thread,
                    &disruption.prompt,
                    Some(&collation1),
                    &self.registry,
                    Arc::clone(&self.gateway),
                    Arc::clone(&self.accessor),
                )
                .await;
                self.checkpoints
                    .save(
                        thread,
                        CHECKPOINT_PHASE2,
                        "revision",
                        None,
                        serde_json::to_value(&collation).map_err(|e| TarmacError::Internal(e.to_string()))?,
                        json!({}),
                    )
                    .await
                    .map_err(OrchestratorError::from)?;
                collation
            }
        };
        let phase2_duration_seconds = phase2_started.elapsed().as_secs_f64();

        if collation1.all_safety_unavailable() && collation2.all_safety_unavailable() {
            self.checkpoints
                .save(
                    thread,
                    CHECKPOINT_UNAVAILABLE,
                    "revision",
                    None,
                    json!({ "reason": "all_safety_unavailable" }),
                    json!({}),
                )
                .await
                .map_err(OrchestratorError::from)?;
            return Err(TarmacError::Unavailable { thread });
        }

        let phase3_started = Instant::now();
        let output = self
            .arbitrator
            .arbitrate(thread, &disruption.prompt, Some(&collation1), &collation2)
            .await
            .map_err(OrchestratorError::from)?;
        let phase3_duration_seconds = phase3_started.elapsed().as_secs_f64();

        self.checkpoints
            .save(
                thread,
                CHECKPOINT_PHASE3,
                "arbitration",
                None,
                serde_json::to_value(&output).map_err(|e| TarmacError::Internal(e.to_string()))?,
                json!({}),
            )
            .await
            .map_err(OrchestratorError::from)?;
        self.checkpoints
            .save(thread, CHECKPOINT_END, "end", None, json!({}), json!({}))
            .await
            .map_err(OrchestratorError::from)?;

        Ok(OrchestrationResult {
            thread,
            output,
            collation1,
            collation2,
            phase1_duration_seconds,
            phase2_duration_seconds,
            phase3_duration_seconds,
        })
    }

    /// Reconstruct whichever phase collations are already checkpointed for
    /// `thread`, so `handle_disruption` can skip re-running them (§4.1
    /// "Recovery"). Returns `Ok(None)` for a thread with no checkpoints.
    pub async fn resume(&self, thread: Uuid) -> Result<Option<ResumeState>, OrchestratorError> {
        let records = self.checkpoints.list(thread).await?;
        if records.is_empty() {
            return Ok(None);
        }

        let mut state = ResumeState::default();
        for record in &records {
            state.latest_checkpoint_id = record.checkpoint_id.clone();
            match record.checkpoint_id.as_str() {
                CHECKPOINT_PHASE1 => state.collation1 = Some(decode(record)?),
                CHECKPOINT_PHASE2 => state.collation2 = Some(decode(record)?),
                _ => {}
            }
        }
        Ok(Some(state))
    }
}

fn decode(record: &tarmac_core::CheckpointRecord) -> Result<Collation, OrchestratorError> {
    let value = match &record.state {
        tarmac_core::CheckpointState::Inline(v) => v.clone(),
        tarmac_core::CheckpointState::Reference { object_key } => {
            return Err(OrchestratorError::CorruptCheckpoint {
                checkpoint_id: record.checkpoint_id.clone(),
                detail: format!("unresolved reference to {object_key}"),
            })
        }
    };
    serde_json::from_value(value).map_err(|e| OrchestratorError::CorruptCheckpoint {
        checkpoint_id: record.checkpoint_id.clone(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use tarmac_accessor::{BatchedAccessor, MockStore};
    use tarmac_gateway::MockGateway;

    fn healthy_response() -> serde_json::Value {
        json!({
            "recommendation": "delay departure 45 minutes",
            "confidence": 0.8,
            "reasoning": "weather clears by then",
            "binding_constraints": [],
        })
    }

    fn arbitration_response() -> serde_json::Value {
        json!({
            "candidates": [{
                "title": "Delay and rebook connections",
                "description": "Hold the aircraft and proactively rebook tight connections",
                "recommendations": ["hold departure", "rebook connections"],
                "pros": ["keeps crew legal"],
                "cons": ["some delay"],
                "risks": [],
                "confidence": 0.8,
                "steps": [{
                    "step_name": "hold departure",
                    "description": "hold the aircraft on stand",
                    "responsible_agent": "network",
                    "depends_on_steps": [],
                    "estimated_duration_minutes": 45.0,
                    "automation_possible": false,
                    "action_type": "hold",
                    "success_criteria": "weather clears",
                    "rollback_procedure": null,
                }],
                "contingency_plans": [],
                "safety_margin": 90.0,
                "violated_constraints": [],
                "estimated_cost_usd": 5000.0,
                "passengers_affected": 120,
                "delay_hours": 0.75,
                "involves_cancellation": false,
                "downstream_flights_affected": 1,
                "missed_connections": 0,
            }],
            "conflicts": [],
            "justification": "delay is the safest viable option",
            "reasoning": "crew rest and weather both favor a short hold",
            "confidence": 0.8,
            "model_used": "test-model",
        })
    }

    fn build(gateway: Arc<dyn ModelGateway>) -> Orchestrator {
        let registry = AnalyzerRegistry::standard();
        let checkpoints = Arc::new(CheckpointStore::in_memory());
        let accessor = Arc::new(BatchedAccessor::new(MockStore::new().arc()));
        let arbitrator = Arbitrator::new(Arc::clone(&gateway));
        Orchestrator::new(registry, checkpoints, accessor, gateway, arbitrator)
    }

    /// Every call returns the same fixed JSON regardless of which analyzer
    /// or the arbitrator is asking; good enough to exercise the full phase
    /// barrier and checkpoint trail end to end.
    struct RoutingGateway;

    #[async_trait::async_trait]
    impl ModelGateway for RoutingGateway {
        async fn complete(
            &self,
            _prompt: &str,
            schema: &serde_json::Value,
            _tier: tarmac_core::ModelTier,
        ) -> Result<serde_json::Value, tarmac_gateway::GatewayError> {
            if schema.get("properties").and_then(|p| p.get("candidates")).is_some() {
                Ok(arbitration_response())
            } else {
                Ok(healthy_response())
            }
        }
    }

    #[tokio::test]
    async fn full_run_checkpoints_every_phase_and_returns_a_decision() {
        let orchestrator = build(Arc::new(RoutingGateway));

        let result = orchestrator
            .handle_disruption("Flight EY123 delayed due to a thunderstorm over the hub airport", None)
            .await
            .unwrap();

        assert!(!result.output.solution_options.is_empty());
        let records = orchestrator.checkpoints.list(result.thread).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.checkpoint_id.as_str()).collect();
        assert!(ids.contains(&CHECKPOINT_START));
        assert!(ids.contains(&CHECKPOINT_PHASE1));
        assert!(ids.contains(&CHECKPOINT_PHASE2));
        assert!(ids.contains(&CHECKPOINT_PHASE3));
        assert!(ids.contains(&CHECKPOINT_END));
    }

    #[tokio::test]
    async fn all_safety_unavailable_across_both_phases_halts_before_arbitration() {
        let orchestrator = build(Arc::new(MockGateway::failing_with("model offline")));

        let err = orchestrator
            .handle_disruption("Flight EY123 delayed due to a thunderstorm over the hub airport", None)
            .await
            .unwrap_err();

        assert!(matches!(err, TarmacError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn resume_reuses_checkpointed_phase_collations() {
        let orchestrator = build(Arc::new(RoutingGateway));

        let first = orchestrator
            .handle_disruption("Flight EY123 delayed due to a thunderstorm over the hub airport", None)
            .await
            .unwrap();

        let resumed = orchestrator.resume(first.thread).await.unwrap().unwrap();
        assert!(resumed.collation1.is_some());
        assert!(resumed.collation2.is_some());
    }

    #[tokio::test]
    async fn unknown_thread_has_no_resume_state() {
        let orchestrator = build(Arc::new(RoutingGateway));
        assert!(orchestrator.resume(Uuid::new_v4()).await.unwrap().is_none());
    }
}
