use tarmac_core::AgentName;

use super::keys::{flight_token, keyed};
use super::template::DomainAnalyzer;

/// Slot, airspace, and regulatory filing constraints. Safety tier.
pub fn regulatory_analyzer() -> DomainAnalyzer {
    DomainAnalyzer::new(AgentName::Regulatory, "regulatory_filings", |prompt| {
        keyed(flight_token(prompt), &["slot_allocation", "airspace_notam"])
    })
}
