//! Shared analyzer body (§4.2): batched read, one model call, parse
//! response into an `AnalyzerResponse`. Every domain analyzer is this
//! struct configured with its agent identity, its operational table, and
//! the keys it needs for the current disruption.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};

use tarmac_core::{AgentName, AnalyzerPhase, AnalyzerResponse, ModelTier};

use crate::contract::{build_envelope, Analyzer, AnalyzerInput};

/// Derives the operational-store keys a domain analyzer needs for a given
/// disruption prompt. Kept as a plain function pointer (no closures) so
/// `DomainAnalyzer` stays `Send + Sync + 'static` without boxing.
pub type KeyDeriver = fn(&str) -> Vec<String>;

pub struct DomainAnalyzer {
    agent_name: AgentName,
    table: &'static str,
    derive_keys: KeyDeriver,
}

impl DomainAnalyzer {
    pub fn new(agent_name: AgentName, table: &'static str, derive_keys: KeyDeriver) -> Self {
        Self {
            agent_name,
            table,
            derive_keys,
        }
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recommendation": {"type": "string"},
                "confidence": {"type": "number"},
                "reasoning": {"type": "string"},
                "binding_constraints": {"type": "array", "items": {"type": "string"}},
            },
            "required": ["recommendation", "confidence", "reasoning"],
        })
    }
}

#[async_trait]
impl Analyzer for DomainAnalyzer {
    fn agent_name(&self) -> AgentName {
        self.agent_name
    }

    async fn run(&self, input: AnalyzerInput) -> AnalyzerResponse {
        let started = Instant::now();
        let phase = input.phase;

        let keys = (self.derive_keys)(&input.prompt_envelope);
        let batch = if keys.is_empty() {
            Default::default()
        } else {
            match input.data_accessor.batch_get(self.table, &keys, None).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(agent = %self.agent_name, error = %err, "operational data read failed");
                    Default::default()
                }
            }
        };

        let mut envelope = build_envelope(&input.prompt_envelope, phase, input.prior_phase.as_ref());
        envelope["operational_data"] = json!(batch.items);
        let prompt = envelope.to_string();

        let tier: ModelTier = self.agent_name.into();
        let schema = self.schema();

        match input.model.complete(&prompt, &schema, tier).await {
            Ok(value) => self.parse_response(value, phase, started.elapsed().as_secs_f64()),
            Err(err) => AnalyzerResponse::errored(self.agent_name, phase, err.to_string(), started.elapsed().as_secs_f64()),
        }
    }
}

impl DomainAnalyzer {
    fn parse_response(&self, value: Value, phase: AnalyzerPhase, duration_seconds: f64) -> AnalyzerResponse {
        let recommendation = value.get("recommendation").and_then(Value::as_str).unwrap_or_default();
        let confidence = value.get("confidence").and_then(Value::as_f64).unwrap_or(0.0).clamp(0.0, 1.0);
        let reasoning = value.get("reasoning").and_then(Value::as_str).unwrap_or_default();

        let binding_constraints = if self.agent_name.is_safety() {
            value
                .get("binding_constraints")
                .and_then(Value::as_array)
                .map(|arr| arr.iter().filter_map(Value::as_str).map(String::from).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        AnalyzerResponse::success(
            self.agent_name,
            phase,
            recommendation,
            confidence,
            binding_constraints,
            reasoning,
            duration_seconds,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use uuid::Uuid;

    use tarmac_accessor::{BatchedAccessor, MockStore};
    use tarmac_core::{AgentName, AnalyzerPhase, AnalyzerStatus};
    use tarmac_gateway::MockGateway;

    use super::*;
    use crate::domains::crew_compliance_analyzer;

    fn input(model: Arc<MockGateway>) -> AnalyzerInput {
        AnalyzerInput {
            prompt_envelope: "Flight EY123 delayed 2 hours due to weather".to_string(),
            phase: AnalyzerPhase::Initial,
            thread: Uuid::new_v4(),
            model,
            data_accessor: Arc::new(BatchedAccessor::new(MockStore::new().arc())),
            prior_phase: None,
        }
    }

    #[tokio::test]
    async fn safety_analyzer_surfaces_binding_constraints_from_model_output() {
        let gateway = Arc::new(MockGateway::responding_with(json!({
            "recommendation": "delay departure 90 minutes for crew rest",
            "confidence": 0.82,
            "reasoning": "FDP would be exceeded otherwise",
            "binding_constraints": ["FDP exceeded"],
        })));
        let analyzer = crew_compliance_analyzer();

        let response = analyzer.run(input(gateway)).await;

        assert_eq!(response.agent_name, AgentName::CrewCompliance);
        assert_eq!(response.status, AnalyzerStatus::Success);
        assert_eq!(response.binding_constraints, vec!["FDP exceeded".to_string()]);
        assert!((response.confidence - 0.82).abs() < 1e-9);
    }

    #[tokio::test]
    async fn model_failure_is_folded_into_an_errored_response_not_propagated() {
        let gateway = Arc::new(MockGateway::failing_with("upstream reset"));
        let analyzer = crew_compliance_analyzer();

        let response = analyzer.run(input(gateway)).await;

        assert_eq!(response.status, AnalyzerStatus::Error);
        assert_eq!(response.confidence, 0.0);
    }
}
