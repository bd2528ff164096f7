//! The seven fixed analyzer identities (Glossary).

use serde::{Deserialize, Serialize};

/// One of the seven domain analyzers.
///
/// The authoritative set per §9's open-question resolution: the seven
/// domain analyzers below, not the ten-name variant (which also counts the
/// arbitrator, orchestrator, and execution agent) that appears in some
/// source documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentName {
    CrewCompliance,
    Maintenance,
    Regulatory,
    Network,
    GuestExperience,
    Cargo,
    Finance,
}

impl AgentName {
    /// All seven analyzers, in a stable order used for fan-out and display.
    pub const ALL: [AgentName; 7] = [
        AgentName::CrewCompliance,
        AgentName::Maintenance,
        AgentName::Regulatory,
        AgentName::Network,
        AgentName::GuestExperience,
        AgentName::Cargo,
        AgentName::Finance,
    ];

    /// Safety-tier analyzers may emit binding constraints; business-tier
    /// analyzers must not.
    pub fn tier(&self) -> AgentTier {
        match self {
            AgentName::CrewCompliance | AgentName::Maintenance | AgentName::Regulatory => {
                AgentTier::Safety
            }
            AgentName::Network | AgentName::GuestExperience | AgentName::Cargo | AgentName::Finance => {
                AgentTier::Business
            }
        }
    }

    pub fn is_safety(&self) -> bool {
        self.tier() == AgentTier::Safety
    }

    /// Per-agent supervisor deadline (§4.1): safety analyzers get 60s,
    /// business analyzers get 45s.
    pub fn deadline_seconds(&self) -> u64 {
        match self.tier() {
            AgentTier::Safety => 60,
            AgentTier::Business => 45,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentName::CrewCompliance => "crew_compliance",
            AgentName::Maintenance => "maintenance",
            AgentName::Regulatory => "regulatory",
            AgentName::Network => "network",
            AgentName::GuestExperience => "guest_experience",
            AgentName::Cargo => "cargo",
            AgentName::Finance => "finance",
        }
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety analyzers gate on binding constraints; business analyzers trade off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentTier {
    Safety,
    Business,
}

/// Which model tier an analyzer (or the arbitrator) is routed to (§6.1).
///
/// Routing is a pure function of `AgentName`: safety analyzers and the
/// arbitrator get the higher-capacity model, business analyzers get the
/// faster/cheaper one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    Fast,
    Balanced,
    HighCapacity,
}

impl From<AgentName> for ModelTier {
    fn from(agent: AgentName) -> Self {
        match agent.tier() {
            AgentTier::Safety => ModelTier::HighCapacity,
            AgentTier::Business => ModelTier::Fast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_tier_membership() {
        assert!(AgentName::CrewCompliance.is_safety());
        assert!(AgentName::Maintenance.is_safety());
        assert!(AgentName::Regulatory.is_safety());
        assert!(!AgentName::Network.is_safety());
        assert!(!AgentName::GuestExperience.is_safety());
        assert!(!AgentName::Cargo.is_safety());
        assert!(!AgentName::Finance.is_safety());
    }

    #[test]
    fn deadlines_match_tier() {
        assert_eq!(AgentName::Regulatory.deadline_seconds(), 60);
        assert_eq!(AgentName::Finance.deadline_seconds(), 45);
    }

    #[test]
    fn routing_is_pure_function_of_name() {
        assert_eq!(ModelTier::from(AgentName::Maintenance), ModelTier::HighCapacity);
        assert_eq!(ModelTier::from(AgentName::Cargo), ModelTier::Fast);
    }

    #[test]
    fn all_contains_seven_distinct_agents() {
        let mut names: Vec<&str> = AgentName::ALL.iter().map(|a| a.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }
}
