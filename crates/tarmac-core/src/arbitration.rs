//! ArbitratorOutput and dual-phase recommendation evolution (§3, §4.3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentName;
use crate::analyzer::AnalyzerPhase;
use crate::conflict::{ConflictDetail, ResolutionDetail, SafetyOverride};
use crate::error::ValidationViolation;
use crate::solution::RecoverySolution;

/// How one agent's position changed (or didn't) between Phase 1 and Phase 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentEvolutionKind {
    Unchanged,
    Converged,
    Diverged,
    NewInPhase2,
    DroppedInPhase2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEvolution {
    pub agent_name: AgentName,
    pub kind: AgentEvolutionKind,
    pub phase1_recommendation: Option<String>,
    pub phase2_recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEvolution {
    pub per_agent: Vec<AgentEvolution>,
    pub changed_count: usize,
    pub unchanged_count: usize,
    pub convergence_detected: bool,
    pub divergence_detected: bool,
    /// Constraints present in Phase 1 but absent in Phase 2 (informational).
    pub constraints_removed: Vec<String>,
    /// Constraints newly discovered in Phase 2.
    pub constraints_added: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitratorOutput {
    /// 1 to 3 entries, strictly ordered by composite_score descending (ties
    /// broken by safety_score descending, then by solution_id ascending).
    pub solution_options: Vec<RecoverySolution>,
    pub recommended_solution_id: u8,
    pub conflicts_identified: Vec<ConflictDetail>,
    pub conflict_resolutions: Vec<ResolutionDetail>,
    pub safety_overrides: Vec<SafetyOverride>,
    pub recommendation_evolution: Option<RecommendationEvolution>,
    pub phases_considered: Vec<AnalyzerPhase>,
    /// Always populated from the recommended solution's description (§3).
    pub final_decision: String,
    /// Always populated from the recommended solution's recommendations (§3).
    pub recommendations: Vec<String>,
    pub justification: String,
    pub reasoning: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub model_used: Option<String>,
    pub duration_seconds: f64,
}

impl ArbitratorOutput {
    /// P2, P3, P8: solution count, ranking order, and backward-compat
    /// population.
    pub fn validate(&self) -> Vec<ValidationViolation> {
        let mut violations = Vec::new();

        if !(1..=3).contains(&self.solution_options.len()) {
            violations.push(ValidationViolation::new(
                "solution_options",
                format!("expected 1-3 solutions, got {}", self.solution_options.len()),
            ));
        }

        for w in self.solution_options.windows(2) {
            let (a, b) = (&w[0], &w[1]);
            if a.composite_score < b.composite_score {
                violations.push(ValidationViolation::new(
                    "solution_options",
                    "composite_score must be non-increasing across solution_options",
                ));
            } else if (a.composite_score - b.composite_score).abs() < f64::EPSILON && a.safety_score < b.safety_score {
                violations.push(ValidationViolation::new(
                    "solution_options",
                    "on equal composite_score, earlier solution must have >= safety_score",
                ));
            }
        }

        let ids: Vec<u8> = self.solution_options.iter().map(|s| s.solution_id).collect();
        if !ids.contains(&self.recommended_solution_id) {
            violations.push(ValidationViolation::new(
                "recommended_solution_id",
                "recommended_solution_id must reference one of solution_options",
            ));
        }

        if let Some(recommended) = self.solution_options.iter().find(|s| s.solution_id == self.recommended_solution_id) {
            if self.final_decision != recommended.description {
                violations.push(ValidationViolation::new("final_decision", "must equal recommended solution's description"));
            }
            if self.recommendations != recommended.recommendations {
                violations.push(ValidationViolation::new("recommendations", "must equal recommended solution's recommendations"));
            }
        }

        violations
    }
}
