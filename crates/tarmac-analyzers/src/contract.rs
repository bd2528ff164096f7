//! The uniform call/response shape every domain analyzer obeys (§4.2).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use tarmac_accessor::BatchedAccessor;
use tarmac_core::{AgentName, AnalyzerPhase, AnalyzerResponse};
use tarmac_gateway::ModelGateway;

/// What Phase 1 concluded, grouped per analyzer, handed to every analyzer
/// in Phase 2 so it can revise its own position (§4.1, §4.2).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PriorPhaseContext {
    pub per_agent: std::collections::HashMap<AgentName, AnalyzerResponse>,
}

/// Everything an analyzer needs to produce one `AnalyzerResponse` (§4.2).
pub struct AnalyzerInput {
    pub prompt_envelope: String,
    pub phase: AnalyzerPhase,
    pub thread: Uuid,
    pub model: Arc<dyn ModelGateway>,
    pub data_accessor: Arc<BatchedAccessor>,
    pub prior_phase: Option<PriorPhaseContext>,
}

/// One domain worker. Implementations invoke the model exactly once, read
/// operational data exclusively through the supplied accessor, and never
/// let an internal error escape — `run` only fails on a logic bug, not on
/// a transient dependency error (those are folded into the response via
/// `AnalyzerResponse::errored`/`timed_out` by the orchestrator's supervisor).
#[async_trait]
pub trait Analyzer: Send + Sync {
    fn agent_name(&self) -> AgentName;

    async fn run(&self, input: AnalyzerInput) -> AnalyzerResponse;
}

/// Build the structured phase-1 or phase-2 envelope an analyzer is asked
/// to reason over. The schema is opaque to the model gateway (§6.1); this
/// is just the JSON payload content.
pub fn build_envelope(disruption_prompt: &str, phase: AnalyzerPhase, prior_phase: Option<&PriorPhaseContext>) -> Value {
    match phase {
        AnalyzerPhase::Initial => serde_json::json!({
            "task": "initial_analysis",
            "disruption": disruption_prompt,
        }),
        AnalyzerPhase::Revision => serde_json::json!({
            "task": "revision",
            "disruption": disruption_prompt,
            "phase1_collation": prior_phase.map(|p| &p.per_agent),
        }),
    }
}
