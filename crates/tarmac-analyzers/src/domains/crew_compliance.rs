use tarmac_core::AgentName;

use super::keys::{flight_token, keyed};
use super::template::DomainAnalyzer;

/// Flight-duty-period and crew-rest rules. Safety tier: may emit binding
/// constraints (e.g. `"FDP exceeded"`).
pub fn crew_compliance_analyzer() -> DomainAnalyzer {
    DomainAnalyzer::new(AgentName::CrewCompliance, "crew_roster", |prompt| {
        keyed(flight_token(prompt), &["roster", "duty_log", "rest_window"])
    })
}
