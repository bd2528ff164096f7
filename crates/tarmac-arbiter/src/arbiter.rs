//! The Arbitrator (§4.3): consumes one or two Collations and produces the
//! final `ArbitratorOutput` — conflicts, binding-constraint enforcement,
//! 1-3 scored and ranked `RecoverySolution`s, and the back-compat fields.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use tarmac_core::{AnalyzerPhase, Collation, ModelTier, RecoverySolution};
use tarmac_gateway::{retrieve_or_empty, ModelGateway, RetrievalService};

use crate::audit::{ArbitrationAuditEntry, ArbitrationAuditLog};
use crate::constraints;
use crate::conflicts;
use crate::error::ArbiterError;
use crate::evolution;
use crate::facts::{arbitration_schema, parse_model_output, CandidateFacts};
use crate::plan;
use crate::scoring;

pub struct Arbitrator {
    model: Arc<dyn ModelGateway>,
    retrieval: Option<Arc<dyn RetrievalService>>,
    audit: Arc<ArbitrationAuditLog>,
}

impl Arbitrator {
    pub fn new(model: Arc<dyn ModelGateway>) -> Self {
        Self {
            model,
            retrieval: None,
            audit: Arc::new(ArbitrationAuditLog::default()),
        }
    }

    pub fn with_retrieval(mut self, retrieval: Arc<dyn RetrievalService>) -> Self {
        self.retrieval = Some(retrieval);
        self
    }

    pub fn with_audit_log(mut self, audit: Arc<ArbitrationAuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn audit_log(&self) -> Arc<ArbitrationAuditLog> {
        Arc::clone(&self.audit)
    }

    /// Produce the final `ArbitratorOutput` from Collation2, optionally
    /// informed by Collation1 (§4.3). The Arbitrator is always routed to
    /// the high-capacity model tier (§4.1 "Agent->model routing").
    pub async fn arbitrate(
        &self,
        thread: Uuid,
        disruption_summary: &str,
        phase1: Option<&Collation>,
        phase2: &Collation,
    ) -> Result<tarmac_core::ArbitratorOutput, ArbiterError> {
        let started = Instant::now();

        let constraint_delta = constraints::extract(phase1, phase2);

        let passages = match &self.retrieval {
            Some(service) => retrieve_or_empty(service.as_ref(), disruption_summary).await,
            None => Vec::new(),
        };

        let prompt = build_prompt(thread, disruption_summary, phase1, phase2, &constraint_delta.active, &passages);
        let schema = arbitration_schema();
        let raw = self.model.complete(&prompt, &schema, ModelTier::HighCapacity).await?;

        let model_output = parse_model_output(&raw);

        let mut solutions = model_output
            .as_ref()
            .map(|o| build_solutions(&o.candidates))
            .unwrap_or_default();

        if solutions.is_empty() {
            solutions.push(conservative_fallback());
        }

        rank_and_assign_ids(&mut solutions);

        let (conflicts_identified, conflict_resolutions, safety_overrides) = model_output
            .as_ref()
            .map(|o| conflicts::resolve(&o.conflicts))
            .unwrap_or_default();

        let recommendation_evolution = phase1.map(|p1| evolution::compute(Some(p1), phase2, &constraint_delta));

        let missing_agents = phase2.missing_agents();
        let mut confidence = model_output.as_ref().map(|o| o.confidence).unwrap_or(0.0).clamp(0.0, 1.0);
        let mut reasoning = model_output.as_ref().map(|o| o.reasoning.clone()).unwrap_or_else(|| {
            "model response could not be parsed; falling back to a conservative manual-review solution".to_string()
        });
        if !missing_agents.is_empty() {
            confidence = (confidence - 0.05 * missing_agents.len() as f64).max(0.0);
            reasoning.push_str(&format!(
                " (confidence reduced: {} agent(s) did not return a successful response: {})",
                missing_agents.len(),
                missing_agents.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", ")
            ));
        }

        let recommended = solutions.first().expect("rank_and_assign_ids never returns an empty set");
        let recommended_solution_id = recommended.solution_id;
        let final_decision = recommended.description.clone();
        let recommendations = recommended.recommendations.clone();

        let phases_considered = match phase1 {
            Some(_) => vec![AnalyzerPhase::Initial, AnalyzerPhase::Revision],
            None => vec![AnalyzerPhase::Revision],
        };

        let output = tarmac_core::ArbitratorOutput {
            solution_options: solutions,
            recommended_solution_id,
            conflicts_identified,
            conflict_resolutions,
            safety_overrides,
            recommendation_evolution,
            phases_considered,
            final_decision,
            recommendations,
            justification: model_output.as_ref().map(|o| o.justification.clone()).unwrap_or_else(|| {
                "no candidate from the model satisfied every binding constraint; recommending manual review".to_string()
            }),
            reasoning,
            confidence,
            timestamp: Utc::now(),
            model_used: model_output.and_then(|o| o.model_used),
            duration_seconds: started.elapsed().as_secs_f64(),
        };

        self.audit
            .record(ArbitrationAuditEntry {
                thread,
                timestamp: output.timestamp,
                recommended_solution_id: output.recommended_solution_id,
                conflict_count: output.conflicts_identified.len(),
                solution_count: output.solution_options.len(),
            })
            .await;

        Ok(output)
    }
}

/// Build a solution for every candidate that (a) satisfies every binding
/// constraint and (b) produces a valid recovery plan (§4.3). Rejected
/// candidates are dropped silently here; they never reach `ArbitratorOutput`.
fn build_solutions(candidates: &[CandidateFacts]) -> Vec<RecoverySolution> {
    let mut out = Vec::new();
    for facts in candidates {
        if !facts.violated_constraints.is_empty() {
            tracing::info!(
                violated = ?facts.violated_constraints,
                "dropping candidate that violates one or more binding constraints"
            );
            continue;
        }

        let recovery_plan = match plan::build_for_candidate(facts) {
            Some(p) => p,
            None => {
                tracing::warn!(title = %facts.title, "dropping candidate with an unrepairable recovery plan");
                continue;
            }
        };

        let scores = scoring::score(facts);
        // solution_id is reassigned by rank_and_assign_ids; 0 is a placeholder.
        let solution = RecoverySolution::new(
            0,
            facts.title.clone(),
            facts.description.clone(),
            facts.recommendations.clone(),
            scores.safety,
            scores.cost,
            scores.passenger,
            scores.network,
            facts.pros.clone(),
            facts.cons.clone(),
            facts.risks.clone(),
            facts.confidence.clamp(0.0, 1.0),
            recovery_plan.steps.iter().map(|s| s.estimated_duration_minutes).sum(),
            recovery_plan,
        );

        if !solution.validate().is_empty() {
            tracing::warn!(title = %facts.title, "dropping candidate that failed post-construction validation");
            continue;
        }

        out.push(solution);
    }

    // Pareto filter (§4.3, P6): drop any solution dominated by another.
    let survivors: Vec<RecoverySolution> = out
        .iter()
        .enumerate()
        .filter(|(i, s)| !out.iter().enumerate().any(|(j, other)| *i != j && s.dominated_by(other)))
        .map(|(_, s)| s.clone())
        .collect();

    // Cap at 3 distinct trade-off profiles (§3): keep the three with the
    // highest composite_score if more than three survive Pareto filtering.
    let mut survivors = survivors;
    survivors.sort_by(|a, b| b.composite_score.partial_cmp(&a.composite_score).unwrap_or(std::cmp::Ordering::Equal));
    survivors.truncate(3);
    survivors
}

/// One conservative solution recommending manual review, emitted when no
/// candidate survives constraint filtering (§4.3).
fn conservative_fallback() -> RecoverySolution {
    let step = tarmac_core::RecoveryStep {
        step_number: 1,
        step_name: "escalate for manual review".to_string(),
        description: "No automated recovery option satisfied every binding safety constraint; escalate to a human operator".to_string(),
        responsible_agent: tarmac_core::AgentName::Regulatory,
        dependencies: vec![],
        estimated_duration_minutes: 0.0,
        automation_possible: false,
        action_type: "escalation".to_string(),
        success_criteria: "a human operator has acknowledged the disruption".to_string(),
        rollback_procedure: None,
    };
    let recovery_plan = tarmac_core::RecoveryPlan {
        steps: vec![step],
        critical_path: vec![1],
        contingency_plans: vec!["hold all affected flights pending manual review".to_string()],
    };

    RecoverySolution::new(
        0,
        "Manual review required",
        "No automated option satisfies every binding safety constraint; a human operator must decide",
        vec!["escalate to operations control for manual review".to_string()],
        100.0,
        0.0,
        0.0,
        0.0,
        vec![],
        vec!["no automated option available".to_string()],
        vec!["delay while awaiting manual review".to_string()],
        0.0,
        0.0,
        recovery_plan,
    )
}

/// Sort by composite_score descending, ties by safety_score descending,
/// further ties by original order, then assign final solution_id 1..N
/// (§3 "Ranking & tie-breaking").
fn rank_and_assign_ids(solutions: &mut [RecoverySolution]) {
    solutions.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.safety_score.partial_cmp(&a.safety_score).unwrap_or(std::cmp::Ordering::Equal))
    });
    for (i, solution) in solutions.iter_mut().enumerate() {
        solution.solution_id = (i + 1) as u8;
    }
}

fn build_prompt(
    thread: Uuid,
    disruption_summary: &str,
    phase1: Option<&Collation>,
    phase2: &Collation,
    active_constraints: &[String],
    retrieved_passages: &[String],
) -> String {
    json!({
        "task": "arbitration",
        "thread": thread.to_string(),
        "disruption": disruption_summary,
        "phase1_collation": phase1.map(|c| &c.responses),
        "phase2_collation": &phase2.responses,
        "binding_constraints": active_constraints,
        "reference_passages": retrieved_passages,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarmac_core::{AgentName, AnalyzerResponse};
    use tarmac_gateway::MockGateway;

    fn collation2_with_constraint() -> Collation {
        Collation::new(
            AnalyzerPhase::Revision,
            vec![
                AnalyzerResponse::success(
                    AgentName::CrewCompliance,
                    AnalyzerPhase::Revision,
                    "delay for crew rest",
                    0.9,
                    vec!["FDP exceeded".to_string()],
                    "duty period would be exceeded",
                    1.0,
                ),
                AnalyzerResponse::success(AgentName::Network, AnalyzerPhase::Revision, "45-minute delay", 0.7, vec![], "minimizes network impact", 1.0),
            ],
        )
    }

    fn candidate(title: &str, violated: Vec<&str>) -> serde_json::Value {
        json!({
            "title": title,
            "description": format!("{title} description"),
            "recommendations": ["do the thing"],
            "pros": [],
            "cons": [],
            "risks": [],
            "confidence": 0.8,
            "steps": [{
                "step_name": "notify",
                "description": "notify ops",
                "responsible_agent": "network",
                "depends_on_steps": [],
                "estimated_duration_minutes": 10.0,
                "automation_possible": true,
                "action_type": "notification",
                "success_criteria": "ops acked",
                "rollback_procedure": null,
            }],
            "contingency_plans": [],
            "safety_margin": 0.6,
            "violated_constraints": violated,
            "estimated_cost_usd": 5000.0,
            "passengers_affected": 50,
            "delay_hours": 1.0,
            "involves_cancellation": false,
            "downstream_flights_affected": 1,
            "missed_connections": 0,
        })
    }

    #[tokio::test]
    async fn violating_candidate_is_dropped_and_compliant_one_survives() {
        let model_output = json!({
            "candidates": [candidate("delay", vec![]), candidate("skip rest", vec!["FDP exceeded"])],
            "conflicts": [],
            "justification": "delay respects crew rest",
            "reasoning": "chose the compliant option",
            "confidence": 0.85,
            "model_used": "test-model",
        });
        let gateway = Arc::new(MockGateway::responding_with(model_output));
        let arbitrator = Arbitrator::new(gateway);

        let phase2 = collation2_with_constraint();
        let output = arbitrator
            .arbitrate(Uuid::new_v4(), "Flight EY123 delayed", None, &phase2)
            .await
            .unwrap();

        assert_eq!(output.solution_options.len(), 1);
        assert_eq!(output.solution_options[0].title, "delay");
        assert!(output.solution_options[0].safety_score > 0.0);
    }

    #[tokio::test]
    async fn all_candidates_violating_falls_back_to_manual_review() {
        let model_output = json!({
            "candidates": [candidate("only option", vec!["FDP exceeded"])],
            "conflicts": [],
            "justification": "no compliant option",
            "reasoning": "n/a",
            "confidence": 0.5,
        });
        let gateway = Arc::new(MockGateway::responding_with(model_output));
        let arbitrator = Arbitrator::new(gateway);

        let phase2 = collation2_with_constraint();
        let output = arbitrator
            .arbitrate(Uuid::new_v4(), "Flight EY123 delayed", None, &phase2)
            .await
            .unwrap();

        assert_eq!(output.solution_options.len(), 1);
        assert_eq!(output.solution_options[0].confidence, 0.0);
        assert_eq!(output.recommended_solution_id, 1);
    }

    #[tokio::test]
    async fn final_decision_and_recommendations_match_recommended_solution() {
        let model_output = json!({
            "candidates": [candidate("a", vec![]), candidate("b", vec![])],
            "conflicts": [],
            "justification": "j",
            "reasoning": "r",
            "confidence": 0.7,
        });
        let gateway = Arc::new(MockGateway::responding_with(model_output));
        let arbitrator = Arbitrator::new(gateway);
        let phase2 = Collation::new(
            AnalyzerPhase::Revision,
            vec![AnalyzerResponse::success(AgentName::Network, AnalyzerPhase::Revision, "x", 0.7, vec![], "y", 1.0)],
        );

        let output = arbitrator.arbitrate(Uuid::new_v4(), "disruption", None, &phase2).await.unwrap();
        let recommended = output.solution_options.iter().find(|s| s.solution_id == output.recommended_solution_id).unwrap();
        assert_eq!(output.final_decision, recommended.description);
        assert_eq!(output.recommendations, recommended.recommendations);
        assert!(output.validate().is_empty());
    }
}
