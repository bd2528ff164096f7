use tarmac_core::AgentName;

use super::keys::{flight_token, keyed};
use super::template::DomainAnalyzer;

/// Cargo and belly-hold impact, including time-critical shipments. Business tier.
pub fn cargo_analyzer() -> DomainAnalyzer {
    DomainAnalyzer::new(AgentName::Cargo, "cargo_manifest", |prompt| {
        keyed(flight_token(prompt), &["awb_manifest", "perishable_flags"])
    })
}
