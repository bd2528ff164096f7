use tarmac_core::AgentName;

use super::keys::{flight_token, keyed};
use super::template::DomainAnalyzer;

/// Passenger impact: rebooking options, lounge/meal vouchers, loyalty tier mix. Business tier.
pub fn guest_experience_analyzer() -> DomainAnalyzer {
    DomainAnalyzer::new(AgentName::GuestExperience, "passenger_manifest", |prompt| {
        keyed(flight_token(prompt), &["pax_manifest", "loyalty_tiers", "connection_risk"])
    })
}
