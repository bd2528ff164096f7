//! Conflict detection types (§3, §4.3).

use serde::{Deserialize, Serialize};

use crate::agent::AgentName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    SafetyVsBusiness,
    SafetyVsSafety,
    BusinessVsBusiness,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictDetail {
    pub agents_involved: Vec<AgentName>,
    pub conflict_type: ConflictType,
    pub description: String,
}

impl ConflictDetail {
    pub fn new(agents_involved: Vec<AgentName>, conflict_type: ConflictType, description: impl Into<String>) -> Self {
        Self {
            agents_involved,
            conflict_type,
            description: description.into(),
        }
    }

    /// `agents_involved` must name at least two agents (§3).
    pub fn is_well_formed(&self) -> bool {
        self.agents_involved.len() >= 2
    }
}

/// How a detected conflict was resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionDetail {
    pub conflict_type: ConflictType,
    pub agents_involved: Vec<AgentName>,
    pub resolution: String,
}

/// A safety constraint that overrode a business recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyOverride {
    pub safety_agent: AgentName,
    pub constraint: String,
    pub overridden_agent: AgentName,
    pub overridden_recommendation: String,
}
