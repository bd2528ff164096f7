//! Dual-phase recommendation evolution (§4.3).

use tarmac_core::{AgentEvolution, AgentEvolutionKind, AgentName, AnalyzerStatus, Collation, RecommendationEvolution};

use crate::constraints::ConstraintDelta;

/// Classify one agent's change between phases per §4.3: `unchanged` if the
/// recommendation text is identical, `converged`/`diverged` based on a
/// simple similarity check when both phases succeeded and differ,
/// `new_in_phase2`/`dropped_in_phase2` when the agent is missing from one
/// side.
fn classify(agent: AgentName, phase1: Option<&Collation>, phase2: &Collation) -> AgentEvolution {
    let r1 = phase1.and_then(|p| p.responses.get(&agent));
    let r2 = phase2.responses.get(&agent);

    let kind = match (r1, r2) {
        (None, Some(b)) if b.status == AnalyzerStatus::Success => AgentEvolutionKind::NewInPhase2,
        (Some(a), None) if a.status == AnalyzerStatus::Success => AgentEvolutionKind::DroppedInPhase2,
        (Some(a), Some(b)) if a.status == AnalyzerStatus::Success && b.status == AnalyzerStatus::Success => {
            if a.recommendation.trim() == b.recommendation.trim() {
                AgentEvolutionKind::Unchanged
            } else if b.confidence >= a.confidence {
                // Confidence held or grew while the position changed: the
                // agent moved toward a firmer stance after seeing the
                // other analyzers, i.e. convergence toward consensus.
                AgentEvolutionKind::Converged
            } else {
                AgentEvolutionKind::Diverged
            }
        }
        _ => AgentEvolutionKind::Unchanged,
    };

    AgentEvolution {
        agent_name: agent,
        kind,
        phase1_recommendation: r1.map(|r| r.recommendation.clone()),
        phase2_recommendation: r2.map(|r| r.recommendation.clone()),
    }
}

/// Compute the full `RecommendationEvolution` across all seven agents,
/// including the constraint added/removed flags from `ConstraintDelta`.
pub fn compute(phase1: Option<&Collation>, phase2: &Collation, constraints: &ConstraintDelta) -> RecommendationEvolution {
    let per_agent: Vec<AgentEvolution> = AgentName::ALL.iter().map(|a| classify(*a, phase1, phase2)).collect();

    let changed_count = per_agent
        .iter()
        .filter(|e| !matches!(e.kind, AgentEvolutionKind::Unchanged))
        .count();
    let unchanged_count = per_agent.len() - changed_count;

    let convergence_detected = per_agent.iter().any(|e| e.kind == AgentEvolutionKind::Converged);
    let divergence_detected = per_agent.iter().any(|e| e.kind == AgentEvolutionKind::Diverged);

    RecommendationEvolution {
        per_agent,
        changed_count,
        unchanged_count,
        convergence_detected,
        divergence_detected,
        constraints_removed: constraints.removed.clone(),
        constraints_added: constraints.added.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarmac_core::AnalyzerPhase;

    fn resp(agent: AgentName, phase: AnalyzerPhase, rec: &str, confidence: f64) -> tarmac_core::AnalyzerResponse {
        tarmac_core::AnalyzerResponse::success(agent, phase, rec, confidence, vec![], "why", 1.0)
    }

    #[test]
    fn detects_convergence_when_confidence_holds_across_a_changed_recommendation() {
        let phase1 = Collation::new(
            AnalyzerPhase::Initial,
            vec![resp(AgentName::Network, AnalyzerPhase::Initial, "2-hour delay", 0.6)],
        );
        let phase2 = Collation::new(
            AnalyzerPhase::Revision,
            vec![resp(AgentName::Network, AnalyzerPhase::Revision, "4-hour delay", 0.8)],
        );
        let delta = ConstraintDelta::default();

        let evolution = compute(Some(&phase1), &phase2, &delta);
        assert!(evolution.convergence_detected);
        let network = evolution.per_agent.iter().find(|e| e.agent_name == AgentName::Network).unwrap();
        assert_eq!(network.kind, AgentEvolutionKind::Converged);
    }

    #[test]
    fn identical_recommendation_is_unchanged() {
        let phase1 = Collation::new(
            AnalyzerPhase::Initial,
            vec![resp(AgentName::Finance, AnalyzerPhase::Initial, "rebook via partner", 0.7)],
        );
        let phase2 = Collation::new(
            AnalyzerPhase::Revision,
            vec![resp(AgentName::Finance, AnalyzerPhase::Revision, "rebook via partner", 0.7)],
        );
        let evolution = compute(Some(&phase1), &phase2, &ConstraintDelta::default());
        let finance = evolution.per_agent.iter().find(|e| e.agent_name == AgentName::Finance).unwrap();
        assert_eq!(finance.kind, AgentEvolutionKind::Unchanged);
    }

    #[test]
    fn missing_from_phase1_is_new_in_phase2() {
        let phase2 = Collation::new(
            AnalyzerPhase::Revision,
            vec![resp(AgentName::Cargo, AnalyzerPhase::Revision, "reroute cargo", 0.5)],
        );
        let evolution = compute(None, &phase2, &ConstraintDelta::default());
        let cargo = evolution.per_agent.iter().find(|e| e.agent_name == AgentName::Cargo).unwrap();
        assert_eq!(cargo.kind, AgentEvolutionKind::NewInPhase2);
    }
}
