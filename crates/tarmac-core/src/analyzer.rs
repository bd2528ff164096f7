//! AnalyzerResponse and Collation (§3).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentName;
use crate::error::ValidationViolation;

/// Which of the two analysis phases a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerPhase {
    Initial,
    Revision,
}

/// Outcome of one analyzer's supervised call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerStatus {
    Success,
    Timeout,
    Error,
}

/// One analyzer's output for one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerResponse {
    pub agent_name: AgentName,
    pub phase: AnalyzerPhase,
    pub status: AnalyzerStatus,
    pub recommendation: String,
    pub confidence: f64,
    /// Only populated by safety analyzers; empty for business analyzers.
    pub binding_constraints: Vec<String>,
    pub reasoning: String,
    pub duration_seconds: f64,
}

impl AnalyzerResponse {
    /// Construct a successful response.
    pub fn success(
        agent_name: AgentName,
        phase: AnalyzerPhase,
        recommendation: impl Into<String>,
        confidence: f64,
        binding_constraints: Vec<String>,
        reasoning: impl Into<String>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            agent_name,
            phase,
            status: AnalyzerStatus::Success,
            recommendation: recommendation.into(),
            confidence,
            binding_constraints,
            reasoning: reasoning.into(),
            duration_seconds,
        }
    }

    /// Construct the response the supervisor emits on deadline expiry.
    pub fn timed_out(agent_name: AgentName, phase: AnalyzerPhase, duration_seconds: f64) -> Self {
        Self {
            agent_name,
            phase,
            status: AnalyzerStatus::Timeout,
            recommendation: String::new(),
            confidence: 0.0,
            binding_constraints: Vec::new(),
            reasoning: "analyzer did not respond within its supervisor deadline".to_string(),
            duration_seconds,
        }
    }

    /// Construct the response the supervisor emits when the analyzer call errors.
    pub fn errored(agent_name: AgentName, phase: AnalyzerPhase, reason: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            agent_name,
            phase,
            status: AnalyzerStatus::Error,
            recommendation: String::new(),
            confidence: 0.0,
            binding_constraints: Vec::new(),
            reasoning: reason.into(),
            duration_seconds,
        }
    }

    /// Validate the invariants in §3 that aren't enforced by construction
    /// alone (business analyzers must not carry binding constraints).
    pub fn validate(&self) -> Vec<ValidationViolation> {
        let mut violations = Vec::new();
        if !(0.0..=1.0).contains(&self.confidence) {
            violations.push(ValidationViolation::new(
                "confidence",
                format!("confidence {} outside [0, 1]", self.confidence),
            ));
        }
        if self.status != AnalyzerStatus::Success && self.confidence != 0.0 {
            violations.push(ValidationViolation::new(
                "confidence",
                "confidence must be 0 when status is not success".to_string(),
            ));
        }
        if self.duration_seconds < 0.0 {
            violations.push(ValidationViolation::new(
                "duration_seconds",
                "duration_seconds must be non-negative".to_string(),
            ));
        }
        if !self.agent_name.is_safety() && !self.binding_constraints.is_empty() {
            violations.push(ValidationViolation::new(
                "binding_constraints",
                format!("{} is a business analyzer and must not emit binding constraints", self.agent_name),
            ));
        }
        violations
    }
}

/// The immutable set of responses produced by one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collation {
    pub phase: AnalyzerPhase,
    pub timestamp: DateTime<Utc>,
    pub responses: HashMap<AgentName, AnalyzerResponse>,
    pub total_duration_seconds: f64,
}

impl Collation {
    pub fn new(phase: AnalyzerPhase, responses: Vec<AnalyzerResponse>) -> Self {
        let total_duration_seconds = responses.iter().map(|r| r.duration_seconds).sum();
        let responses = responses.into_iter().map(|r| (r.agent_name, r)).collect();
        Self {
            phase,
            timestamp: Utc::now(),
            responses,
            total_duration_seconds,
        }
    }

    /// All binding constraints across safety analyzers, in analyzer order,
    /// de-duplicated while preserving first occurrence.
    pub fn binding_constraints(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for agent in AgentName::ALL.iter().filter(|a| a.is_safety()) {
            if let Some(resp) = self.responses.get(agent) {
                for c in &resp.binding_constraints {
                    if seen.insert(c.clone()) {
                        out.push(c.clone());
                    }
                }
            }
        }
        out
    }

    /// True iff every safety analyzer is present and not `success`.
    pub fn all_safety_unavailable(&self) -> bool {
        AgentName::ALL
            .iter()
            .filter(|a| a.is_safety())
            .all(|a| {
                self.responses
                    .get(a)
                    .map(|r| r.status != AnalyzerStatus::Success)
                    .unwrap_or(true)
            })
    }

    pub fn missing_agents(&self) -> Vec<AgentName> {
        AgentName::ALL
            .iter()
            .copied()
            .filter(|a| {
                self.responses
                    .get(a)
                    .map(|r| r.status != AnalyzerStatus::Success)
                    .unwrap_or(true)
            })
            .collect()
    }
}
