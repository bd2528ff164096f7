//! Binding-constraint extraction and diffing across phases (§4.3).

use tarmac_core::Collation;

/// What changed in the binding-constraint set between Phase 1 and Phase 2.
#[derive(Debug, Clone, Default)]
pub struct ConstraintDelta {
    /// Union of binding constraints across safety analyzers in Collation2
    /// — the set the arbitrator treats as non-negotiable.
    pub active: Vec<String>,
    /// Present in Collation1 but absent from Collation2 (informational,
    /// surfaced in `recommendation_evolution`, never re-added).
    pub removed: Vec<String>,
    /// Newly present in Collation2, absent from Collation1.
    pub added: Vec<String>,
}

/// Extract the active constraint set from Collation2 and, when Collation1
/// is also present, the removed/added deltas against it (§4.3).
pub fn extract(phase1: Option<&Collation>, phase2: &Collation) -> ConstraintDelta {
    let active = phase2.binding_constraints();

    let (removed, added) = match phase1 {
        Some(p1) => {
            let prior = p1.binding_constraints();
            let removed = prior.iter().filter(|c| !active.contains(c)).cloned().collect();
            let added = active.iter().filter(|c| !prior.contains(c)).cloned().collect();
            (removed, added)
        }
        None => (Vec::new(), Vec::new()),
    };

    ConstraintDelta { active, removed, added }
}
