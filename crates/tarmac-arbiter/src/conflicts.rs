//! Turns the model's identified conflicts (§4.3) into the bookkeeping
//! types in `tarmac_core`, validating well-formedness along the way.

use tarmac_core::{ConflictDetail, ResolutionDetail, SafetyOverride};

use crate::facts::ConflictFacts;

/// Validate and convert the model's `ConflictFacts` into the three
/// parallel output collections ArbitratorOutput carries. A conflict with
/// fewer than two `agents_involved` is malformed (§3: "agents_involved
/// (>=2)") and is dropped with a warning rather than propagated.
pub fn resolve(conflicts: &[ConflictFacts]) -> (Vec<ConflictDetail>, Vec<ResolutionDetail>, Vec<SafetyOverride>) {
    let mut details = Vec::new();
    let mut resolutions = Vec::new();
    let mut overrides = Vec::new();

    for c in conflicts {
        let detail = ConflictDetail::new(c.agents_involved.clone(), c.conflict_type, c.description.clone());
        if !detail.is_well_formed() {
            tracing::warn!(
                conflict_type = ?c.conflict_type,
                agents = c.agents_involved.len(),
                "dropping malformed conflict: fewer than two agents_involved"
            );
            continue;
        }

        resolutions.push(ResolutionDetail {
            conflict_type: c.conflict_type,
            agents_involved: c.agents_involved.clone(),
            resolution: c.resolution.clone(),
        });

        if let Some(o) = &c.safety_override {
            overrides.push(SafetyOverride {
                safety_agent: o.safety_agent,
                constraint: o.constraint.clone(),
                overridden_agent: o.overridden_agent,
                overridden_recommendation: o.overridden_recommendation.clone(),
            });
        }

        details.push(detail);
    }

    (details, resolutions, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarmac_core::{AgentName, ConflictType};

    #[test]
    fn well_formed_conflict_produces_detail_and_resolution() {
        let conflicts = vec![ConflictFacts {
            conflict_type: ConflictType::SafetyVsBusiness,
            agents_involved: vec![AgentName::CrewCompliance, AgentName::Network],
            description: "FDP exceeded rules out the 45-minute delay".to_string(),
            resolution: "extend delay to respect crew rest".to_string(),
            safety_override: Some(crate::facts::SafetyOverrideFacts {
                safety_agent: AgentName::CrewCompliance,
                constraint: "FDP exceeded".to_string(),
                overridden_agent: AgentName::Network,
                overridden_recommendation: "45-minute delay".to_string(),
            }),
        }];

        let (details, resolutions, overrides) = resolve(&conflicts);
        assert_eq!(details.len(), 1);
        assert_eq!(resolutions.len(), 1);
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].safety_agent, AgentName::CrewCompliance);
    }

    #[test]
    fn malformed_conflict_with_one_agent_is_dropped() {
        let conflicts = vec![ConflictFacts {
            conflict_type: ConflictType::BusinessVsBusiness,
            agents_involved: vec![AgentName::Finance],
            description: "incomplete".to_string(),
            resolution: "n/a".to_string(),
            safety_override: None,
        }];

        let (details, resolutions, overrides) = resolve(&conflicts);
        assert!(details.is_empty());
        assert!(resolutions.is_empty());
        assert!(overrides.is_empty());
    }
}
