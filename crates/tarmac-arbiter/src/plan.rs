//! Recovery-plan construction from the model's step sketches (§4.3, P7).

use tarmac_core::{RecoveryPlan, RecoveryStep};

use crate::facts::{CandidateFacts, StepFacts};

/// Number the model's step sketches 1..N contiguously (discarding the
/// model's own numbering, if any — `StepFacts::depends_on_steps` is
/// already expressed as 1-based positions in `steps`, which is exactly
/// the numbering we assign), compute the critical path, and attempt the
/// single repair pass (§4.3) if the result doesn't validate.
///
/// Returns `None` if the plan is still invalid after repair, in which
/// case the caller drops the whole candidate (§4.3, §7).
pub fn build(steps: &[StepFacts], contingency_plans: Vec<String>) -> Option<RecoveryPlan> {
    if steps.is_empty() {
        return None;
    }

    let numbered: Vec<RecoveryStep> = steps
        .iter()
        .enumerate()
        .map(|(i, s)| RecoveryStep {
            step_number: (i + 1) as u32,
            step_name: s.step_name.clone(),
            description: s.description.clone(),
            responsible_agent: s.responsible_agent,
            dependencies: s.depends_on_steps.clone(),
            estimated_duration_minutes: s.estimated_duration_minutes,
            automation_possible: s.automation_possible,
            action_type: s.action_type.clone(),
            success_criteria: s.success_criteria.clone(),
            rollback_procedure: s.rollback_procedure.clone(),
        })
        .collect();

    let critical_path = RecoveryPlan::compute_critical_path(&numbered);
    let plan = RecoveryPlan {
        steps: numbered,
        critical_path,
        contingency_plans,
    };

    if plan.validate().is_empty() {
        Some(plan)
    } else {
        plan.repaired()
    }
}

/// Build the plan for a whole candidate, consuming its step sketches and
/// contingency plans.
pub fn build_for_candidate(facts: &CandidateFacts) -> Option<RecoveryPlan> {
    build(&facts.steps, facts.contingency_plans.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarmac_core::AgentName;

    fn step(name: &str, deps: Vec<u32>, minutes: f64) -> StepFacts {
        StepFacts {
            step_name: name.to_string(),
            description: "do it".to_string(),
            responsible_agent: AgentName::Network,
            depends_on_steps: deps,
            estimated_duration_minutes: minutes,
            automation_possible: false,
            action_type: "manual".to_string(),
            success_criteria: "done".to_string(),
            rollback_procedure: None,
        }
    }

    #[test]
    fn builds_contiguous_plan_from_step_sketches() {
        let steps = vec![step("notify", vec![], 5.0), step("rebook", vec![1], 20.0)];
        let plan = build(&steps, vec!["manual fallback".to_string()]).unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].step_number, 2);
        assert!(plan.validate().is_empty());
    }

    #[test]
    fn repairs_self_dependency_from_model() {
        let steps = vec![step("loopy", vec![1], 5.0)];
        let plan = build(&steps, vec![]).unwrap();
        assert!(plan.validate().is_empty());
        assert!(plan.steps[0].dependencies.is_empty());
    }

    #[test]
    fn empty_steps_yield_no_plan() {
        assert!(build(&[], vec![]).is_none());
    }
}
