//! The structured shape the Arbitrator asks the model for (§4.3, §6.1).
//!
//! The model is an opaque callable (spec.md §1 Non-goals): it never scores
//! anything itself. It proposes 1-3 candidate recovery options as raw
//! operational facts (estimated cost, passenger count, delay hours, ...)
//! plus a step-by-step plan sketch, and declares which binding constraints
//! (by exact string) each candidate fails to satisfy. `tarmac_arbiter`
//! turns those facts into scores deterministically (`scoring.rs`) so the
//! composite formula in §3/P4 can never drift from what the model says.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use tarmac_core::{AgentName, ConflictType};

/// One step sketch as proposed by the model, before it has been numbered,
/// validated, or repaired into a `tarmac_core::RecoveryStep`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepFacts {
    pub step_name: String,
    pub description: String,
    pub responsible_agent: AgentName,
    /// 1-based indices into the candidate's own `steps` array this step
    /// depends on, as proposed by the model (subject to repair, §4.3).
    pub depends_on_steps: Vec<u32>,
    pub estimated_duration_minutes: f64,
    pub automation_possible: bool,
    pub action_type: String,
    pub success_criteria: String,
    pub rollback_procedure: Option<String>,
}

/// One candidate recovery option's raw facts, as returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFacts {
    pub title: String,
    pub description: String,
    pub recommendations: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub risks: Vec<String>,
    pub confidence: f64,
    pub steps: Vec<StepFacts>,
    pub contingency_plans: Vec<String>,

    /// Safety margin in [0,1] above the minimum required safety bar;
    /// feeds `scoring::safety_score` unless overridden by a violation.
    pub safety_margin: f64,
    /// Exact binding-constraint strings (from the union set handed to the
    /// model) this candidate fails to satisfy. Non-empty means rejection
    /// (§3/P5) regardless of `safety_margin`.
    pub violated_constraints: Vec<String>,

    pub estimated_cost_usd: f64,
    pub passengers_affected: u32,
    pub delay_hours: f64,
    pub involves_cancellation: bool,
    pub downstream_flights_affected: u32,
    pub missed_connections: u32,
}

/// A safety override the model identified: a binding constraint that took
/// precedence over a specific business recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyOverrideFacts {
    pub safety_agent: AgentName,
    pub constraint: String,
    pub overridden_agent: AgentName,
    pub overridden_recommendation: String,
}

/// One conflict the model identified between two or more analyzer
/// positions in Collation2 (§4.3). Only the model has the semantic
/// context (free-text recommendations and reasoning) to recognize these;
/// the arbitrator's job is to validate well-formedness and turn a
/// confirmed conflict into bookkeeping (`ConflictDetail`/`ResolutionDetail`),
/// not to re-derive it from text itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictFacts {
    pub conflict_type: ConflictType,
    pub agents_involved: Vec<AgentName>,
    pub description: String,
    pub resolution: String,
    pub safety_override: Option<SafetyOverrideFacts>,
}

/// What the Arbitrator sends the model, and what it asks back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrationModelOutput {
    pub candidates: Vec<CandidateFacts>,
    #[serde(default)]
    pub conflicts: Vec<ConflictFacts>,
    pub justification: String,
    pub reasoning: String,
    pub confidence: f64,
    pub model_used: Option<String>,
}

/// JSON schema describing `ArbitrationModelOutput`, handed to the model
/// gateway alongside the prompt (§6.1 — the gateway coerces the model's
/// raw output to conform to this shape).
pub fn arbitration_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "candidates": {
                "type": "array",
                "minItems": 1,
                "maxItems": 3,
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "description": {"type": "string"},
                        "recommendations": {"type": "array", "items": {"type": "string"}},
                        "pros": {"type": "array", "items": {"type": "string"}},
                        "cons": {"type": "array", "items": {"type": "string"}},
                        "risks": {"type": "array", "items": {"type": "string"}},
                        "confidence": {"type": "number"},
                        "steps": {"type": "array"},
                        "contingency_plans": {"type": "array", "items": {"type": "string"}},
                        "safety_margin": {"type": "number"},
                        "violated_constraints": {"type": "array", "items": {"type": "string"}},
                        "estimated_cost_usd": {"type": "number"},
                        "passengers_affected": {"type": "integer"},
                        "delay_hours": {"type": "number"},
                        "involves_cancellation": {"type": "boolean"},
                        "downstream_flights_affected": {"type": "integer"},
                        "missed_connections": {"type": "integer"},
                    },
                    "required": ["title", "description", "estimated_cost_usd", "passengers_affected"],
                },
            },
            "conflicts": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "conflict_type": {"enum": ["safety_vs_business", "safety_vs_safety", "business_vs_business"]},
                        "agents_involved": {"type": "array", "minItems": 2},
                        "description": {"type": "string"},
                        "resolution": {"type": "string"},
                        "safety_override": {"type": ["object", "null"]},
                    },
                },
            },
            "justification": {"type": "string"},
            "reasoning": {"type": "string"},
            "confidence": {"type": "number"},
        },
        "required": ["candidates", "justification", "reasoning", "confidence"],
    })
}

/// Parse the model gateway's raw JSON value into the typed shape.
/// Any structural mismatch (the gateway is expected to coerce to schema,
/// but "expected" is not "guaranteed") becomes `None` rather than a panic;
/// the caller folds a `None` into the conservative fallback (§4.3).
pub fn parse_model_output(value: &Value) -> Option<ArbitrationModelOutput> {
    serde_json::from_value(value.clone()).ok()
}
