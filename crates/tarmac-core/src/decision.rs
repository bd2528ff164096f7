//! DecisionRecord (§3, §4.6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::AnalyzerResponse;
use crate::solution::RecoverySolution;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub actual_delay_minutes: Option<f64>,
    pub actual_cost: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub disruption_id: String,
    /// ISO-8601.
    pub timestamp: DateTime<Utc>,
    pub flight_number: Option<String>,
    pub disruption_type: Option<String>,
    pub disruption_severity: Option<String>,
    pub agent_responses: Vec<AnalyzerResponse>,
    pub solution_options: Vec<RecoverySolution>,
    pub recommended_solution_id: u8,
    pub selected_solution_id: u8,
    pub selection_rationale: Option<String>,
    pub human_override: bool,
    pub outcome: Option<DecisionOutcome>,
}

impl DecisionRecord {
    pub fn new(
        disruption_id: impl Into<String>,
        flight_number: Option<String>,
        disruption_type: Option<String>,
        disruption_severity: Option<String>,
        agent_responses: Vec<AnalyzerResponse>,
        solution_options: Vec<RecoverySolution>,
        recommended_solution_id: u8,
        selected_solution_id: u8,
        selection_rationale: Option<String>,
    ) -> Self {
        Self {
            disruption_id: disruption_id.into(),
            timestamp: Utc::now(),
            flight_number,
            disruption_type,
            disruption_severity,
            agent_responses,
            solution_options,
            recommended_solution_id,
            selected_solution_id,
            human_override: selected_solution_id != recommended_solution_id,
            selection_rationale,
            outcome: None,
        }
    }

    /// `decisions/YYYY/MM/DD/{disruption_id}.json`, date parts derived from
    /// `timestamp` (§3, P12).
    pub fn object_key(&self) -> String {
        format!(
            "decisions/{}/{}.json",
            self.timestamp.format("%Y/%m/%d"),
            self.disruption_id
        )
    }
}
