//! Fixed registry of the seven domain analyzers (§12 supplemented
//! feature). Unlike a general agent registry, membership never changes at
//! runtime — the orchestrator always fans out to exactly these seven — so
//! this is a lookup table rather than a mutable store.
//!
//! Grounded in `packages/nexus/src/registry.rs`'s `AgentRegistry`, narrowed
//! to the closed set this domain actually has.

use std::collections::HashMap;
use std::sync::Arc;

use tarmac_core::AgentName;

use crate::contract::Analyzer;
use crate::domains::{
    cargo_analyzer, crew_compliance_analyzer, finance_analyzer, guest_experience_analyzer, maintenance_analyzer,
    network_analyzer, regulatory_analyzer,
};

pub struct AnalyzerRegistry {
    analyzers: HashMap<AgentName, Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    /// Build the registry with the standard seven domain analyzers (§2).
    pub fn standard() -> Self {
        let mut analyzers: HashMap<AgentName, Arc<dyn Analyzer>> = HashMap::new();
        analyzers.insert(AgentName::CrewCompliance, Arc::new(crew_compliance_analyzer()));
        analyzers.insert(AgentName::Maintenance, Arc::new(maintenance_analyzer()));
        analyzers.insert(AgentName::Regulatory, Arc::new(regulatory_analyzer()));
        analyzers.insert(AgentName::Network, Arc::new(network_analyzer()));
        analyzers.insert(AgentName::GuestExperience, Arc::new(guest_experience_analyzer()));
        analyzers.insert(AgentName::Cargo, Arc::new(cargo_analyzer()));
        analyzers.insert(AgentName::Finance, Arc::new(finance_analyzer()));
        Self { analyzers }
    }

    pub fn get(&self, agent_name: AgentName) -> Arc<dyn Analyzer> {
        self.analyzers
            .get(&agent_name)
            .cloned()
            .unwrap_or_else(|| panic!("analyzer registry missing required agent {agent_name}"))
    }

    /// All seven, in `AgentName::ALL` order, for fan-out.
    pub fn all(&self) -> Vec<Arc<dyn Analyzer>> {
        AgentName::ALL.iter().map(|name| self.get(*name)).collect()
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
