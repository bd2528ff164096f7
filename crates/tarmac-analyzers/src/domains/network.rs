use tarmac_core::AgentName;

use super::keys::{flight_token, keyed};
use super::template::DomainAnalyzer;

/// Downstream flight and connection impact. Business tier.
pub fn network_analyzer() -> DomainAnalyzer {
    DomainAnalyzer::new(AgentName::Network, "network_schedule", |prompt| {
        keyed(flight_token(prompt), &["downstream_legs", "aircraft_rotation", "gate_availability"])
    })
}
