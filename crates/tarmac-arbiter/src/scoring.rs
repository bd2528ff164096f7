//! Deterministic scoring rubric (§4.3 "Scoring" table, §3 composite
//! formula, P4). Every score here is a pure function of `CandidateFacts` —
//! the model proposes facts, this module is the sole authority on turning
//! facts into the four `[0,100]` dimension scores and the composite.

use tarmac_core::solution::composite_score as formula;

use crate::facts::CandidateFacts;

/// 0 on any binding-constraint violation; otherwise 60-100 as a linear
/// function of the model-reported safety margin in `[0,1]`.
pub fn safety_score(facts: &CandidateFacts) -> f64 {
    if !facts.violated_constraints.is_empty() {
        return 0.0;
    }
    let margin = facts.safety_margin.clamp(0.0, 1.0);
    (60.0 + 40.0 * margin).clamp(0.0, 100.0)
}

/// Inverse of incremental cost, tiered by estimated-cost buckets (§4.3).
/// Within a tier, interpolates toward the next tier's floor so two
/// candidates in the same bucket aren't scored identically.
pub fn cost_score(facts: &CandidateFacts) -> f64 {
    const TIERS: [(f64, f64, f64); 5] = [
        // (bucket ceiling, score at ceiling, score at bucket floor)
        (10_000.0, 90.0, 100.0),
        (50_000.0, 70.0, 90.0),
        (150_000.0, 50.0, 70.0),
        (300_000.0, 30.0, 50.0),
        (f64::INFINITY, 0.0, 30.0),
    ];
    let cost = facts.estimated_cost_usd.max(0.0);
    let mut floor = 0.0;
    for (ceiling, score_at_ceiling, score_at_floor) in TIERS {
        if cost <= ceiling {
            if ceiling.is_infinite() {
                // Beyond the last finite tier, decay asymptotically toward 0.
                return (score_at_floor * (300_000.0 / cost.max(300_000.0))).clamp(0.0, score_at_floor);
            }
            let span = ceiling - floor;
            let frac = if span > 0.0 { (cost - floor) / span } else { 0.0 };
            return (score_at_floor - frac * (score_at_floor - score_at_ceiling)).clamp(0.0, 100.0);
        }
        floor = ceiling;
    }
    0.0
}

/// Inverse of passenger impact, tiered by count, penalized by delay hours
/// and a flat penalty when the option involves a cancellation (§4.3).
pub fn passenger_score(facts: &CandidateFacts) -> f64 {
    const TIERS: [(u32, f64); 5] = [(50, 100.0), (150, 80.0), (300, 60.0), (600, 40.0), (u32::MAX, 20.0)];
    let base = TIERS
        .iter()
        .find(|(ceiling, _)| facts.passengers_affected <= *ceiling)
        .map(|(_, score)| *score)
        .unwrap_or(20.0);

    let delay_penalty = (facts.delay_hours.max(0.0) * 2.0).min(40.0);
    let cancellation_penalty = if facts.involves_cancellation { 30.0 } else { 0.0 };

    (base - delay_penalty - cancellation_penalty).clamp(0.0, 100.0)
}

/// Inverse of downstream network disruption, tiered by affected-flight
/// count, penalized by missed connections (§4.3).
pub fn network_score(facts: &CandidateFacts) -> f64 {
    const TIERS: [(u32, f64); 5] = [(2, 100.0), (5, 80.0), (10, 60.0), (20, 40.0), (u32::MAX, 20.0)];
    let base = TIERS
        .iter()
        .find(|(ceiling, _)| facts.downstream_flights_affected <= *ceiling)
        .map(|(_, score)| *score)
        .unwrap_or(20.0);

    let missed_connection_penalty = (facts.missed_connections as f64 * 3.0).min(60.0);

    (base - missed_connection_penalty).clamp(0.0, 100.0)
}

/// The four dimension scores plus the composite, computed in one pass so
/// callers never recompute the formula by hand (keeps P4 true by
/// construction, not by convention).
pub struct Scores {
    pub safety: f64,
    pub cost: f64,
    pub passenger: f64,
    pub network: f64,
    pub composite: f64,
}

pub fn score(facts: &CandidateFacts) -> Scores {
    let safety = safety_score(facts);
    let cost = cost_score(facts);
    let passenger = passenger_score(facts);
    let network = network_score(facts);
    Scores {
        safety,
        cost,
        passenger,
        network,
        composite: formula(safety, cost, passenger, network),
    }
}
