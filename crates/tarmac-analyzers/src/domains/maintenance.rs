use tarmac_core::AgentName;

use super::keys::{flight_token, keyed};
use super::template::DomainAnalyzer;

/// Airworthiness and minimum-equipment-list (MEL) status. Safety tier.
pub fn maintenance_analyzer() -> DomainAnalyzer {
    DomainAnalyzer::new(AgentName::Maintenance, "aircraft_status", |prompt| {
        keyed(flight_token(prompt), &["mel_items", "tech_log", "last_inspection"])
    })
}
