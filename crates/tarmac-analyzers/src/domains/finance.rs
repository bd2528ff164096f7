use tarmac_core::AgentName;

use super::keys::{flight_token, keyed};
use super::template::DomainAnalyzer;

/// Incremental cost of each recovery path: crew overtime, fuel, compensation. Business tier.
pub fn finance_analyzer() -> DomainAnalyzer {
    DomainAnalyzer::new(AgentName::Finance, "cost_ledger", |prompt| {
        keyed(flight_token(prompt), &["crew_overtime_rate", "eu261_exposure", "fuel_cost"])
    })
}
