//! RecoveryPlan: a DAG of RecoverySteps (§3, §4.3, P7).

use serde::{Deserialize, Serialize};

use crate::agent::AgentName;
use crate::error::ValidationViolation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryStep {
    /// 1-based, contiguous within a plan.
    pub step_number: u32,
    pub step_name: String,
    pub description: String,
    pub responsible_agent: AgentName,
    /// Step numbers strictly less than `step_number`, no duplicates.
    pub dependencies: Vec<u32>,
    pub estimated_duration_minutes: f64,
    pub automation_possible: bool,
    pub action_type: String,
    pub success_criteria: String,
    pub rollback_procedure: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryPlan {
    pub steps: Vec<RecoveryStep>,
    pub critical_path: Vec<u32>,
    pub contingency_plans: Vec<String>,
}

impl RecoveryPlan {
    /// Check every invariant in §3/P7: steps numbered 1..N contiguously, no
    /// self-dependency, no forward reference, no duplicate dependency, and
    /// `critical_path` is a subset of the step numbers present.
    pub fn validate(&self) -> Vec<ValidationViolation> {
        let mut violations = Vec::new();

        if self.steps.is_empty() {
            violations.push(ValidationViolation::new("steps", "recovery plan must have at least one step"));
            return violations;
        }

        for (i, step) in self.steps.iter().enumerate() {
            let expected = (i + 1) as u32;
            if step.step_number != expected {
                violations.push(ValidationViolation::new(
                    format!("steps[{i}].step_number"),
                    format!("expected contiguous step_number {expected}, got {}", step.step_number),
                ));
            }

            let mut seen_deps = std::collections::HashSet::new();
            for &dep in &step.dependencies {
                if dep == step.step_number {
                    violations.push(ValidationViolation::new(
                        format!("steps[{i}].dependencies"),
                        format!("step {} cannot depend on itself", step.step_number),
                    ));
                } else if dep >= step.step_number {
                    violations.push(ValidationViolation::new(
                        format!("steps[{i}].dependencies"),
                        format!("step {} has forward/self reference to {dep}", step.step_number),
                    ));
                }
                if !seen_deps.insert(dep) {
                    violations.push(ValidationViolation::new(
                        format!("steps[{i}].dependencies"),
                        format!("duplicate dependency {dep} in step {}", step.step_number),
                    ));
                }
            }

            if step.estimated_duration_minutes < 0.0 {
                violations.push(ValidationViolation::new(
                    format!("steps[{i}].estimated_duration_minutes"),
                    "duration must be non-negative",
                ));
            }
        }

        let step_numbers: std::collections::HashSet<u32> = self.steps.iter().map(|s| s.step_number).collect();
        for &cp in &self.critical_path {
            if !step_numbers.contains(&cp) {
                violations.push(ValidationViolation::new(
                    "critical_path",
                    format!("critical_path references unknown step {cp}"),
                ));
            }
        }

        violations
    }

    /// Because dependencies only ever point backward (enforced by
    /// `validate`), the step graph is a DAG by construction and the
    /// longest chain can be computed with a single forward pass.
    ///
    /// Ties in total duration are broken by preferring the chain whose step
    /// numbers are lowest, per §4.3.
    pub fn compute_critical_path(steps: &[RecoveryStep]) -> Vec<u32> {
        let mut best_duration: std::collections::HashMap<u32, f64> = std::collections::HashMap::new();
        let mut best_chain: std::collections::HashMap<u32, Vec<u32>> = std::collections::HashMap::new();

        for step in steps {
            let mut duration = step.estimated_duration_minutes;
            let mut chain = vec![step.step_number];

            if let Some(&pred) = step
                .dependencies
                .iter()
                .max_by(|&&a, &&b| {
                    let da = best_duration.get(&a).copied().unwrap_or(0.0);
                    let db = best_duration.get(&b).copied().unwrap_or(0.0);
                    da.partial_cmp(&db)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| b.cmp(&a)) // tie -> prefer lower step number predecessor
                })
            {
                duration += best_duration.get(&pred).copied().unwrap_or(0.0);
                let mut pred_chain = best_chain.get(&pred).cloned().unwrap_or_else(|| vec![pred]);
                pred_chain.push(step.step_number);
                chain = pred_chain;
            }

            best_duration.insert(step.step_number, duration);
            best_chain.insert(step.step_number, chain);
        }

        let winner = best_duration
            .iter()
            .max_by(|(k1, d1), (k2, d2)| {
                d1.partial_cmp(d2)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| k2.cmp(k1)) // tie -> lowest step_number set wins
            })
            .map(|(k, _)| *k);

        winner.and_then(|k| best_chain.get(&k).cloned()).unwrap_or_default()
    }

    /// Attempt the single repair pass described in §4.3: drop any
    /// dependency that violates the DAG invariants, then re-validate.
    /// Returns `None` if the plan is still invalid after repair.
    pub fn repaired(mut self) -> Option<Self> {
        if self.validate().is_empty() {
            return Some(self);
        }

        for step in &mut self.steps {
            let n = step.step_number;
            let mut seen = std::collections::HashSet::new();
            step.dependencies.retain(|&d| d < n && seen.insert(d));
        }
        self.critical_path = Self::compute_critical_path(&self.steps);

        if self.validate().is_empty() {
            Some(self)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(n: u32, deps: Vec<u32>, minutes: f64) -> RecoveryStep {
        RecoveryStep {
            step_number: n,
            step_name: format!("step-{n}"),
            description: "do the thing".to_string(),
            responsible_agent: AgentName::Network,
            dependencies: deps,
            estimated_duration_minutes: minutes,
            automation_possible: false,
            action_type: "manual".to_string(),
            success_criteria: "done".to_string(),
            rollback_procedure: None,
        }
    }

    #[test]
    fn valid_plan_has_no_violations() {
        let plan = RecoveryPlan {
            steps: vec![step(1, vec![], 10.0), step(2, vec![1], 20.0), step(3, vec![1], 5.0)],
            critical_path: vec![1, 2],
            contingency_plans: vec![],
        };
        assert!(plan.validate().is_empty());
    }

    #[test]
    fn detects_self_dependency() {
        let plan = RecoveryPlan {
            steps: vec![step(1, vec![1], 10.0)],
            critical_path: vec![1],
            contingency_plans: vec![],
        };
        assert!(!plan.validate().is_empty());
    }

    #[test]
    fn detects_forward_reference() {
        let plan = RecoveryPlan {
            steps: vec![step(1, vec![2], 10.0), step(2, vec![], 5.0)],
            critical_path: vec![1],
            contingency_plans: vec![],
        };
        assert!(!plan.validate().is_empty());
    }

    #[test]
    fn detects_non_contiguous_numbering() {
        let plan = RecoveryPlan {
            steps: vec![step(1, vec![], 1.0), step(3, vec![1], 1.0)],
            critical_path: vec![],
            contingency_plans: vec![],
        };
        assert!(!plan.validate().is_empty());
    }

    #[test]
    fn critical_path_picks_longest_chain() {
        let steps = vec![
            step(1, vec![], 10.0),
            step(2, vec![1], 5.0),
            step(3, vec![1], 30.0),
            step(4, vec![2, 3], 1.0),
        ];
        let cp = RecoveryPlan::compute_critical_path(&steps);
        // 1 -> 3 -> 4 totals 41 vs 1 -> 2 -> 4 totals 16
        assert_eq!(cp, vec![1, 3, 4]);
    }

    #[test]
    fn repair_drops_offending_dependency() {
        let plan = RecoveryPlan {
            steps: vec![step(1, vec![], 1.0), step(2, vec![2, 1], 1.0)],
            critical_path: vec![],
            contingency_plans: vec![],
        };
        let repaired = plan.repaired().expect("repair should succeed by dropping self-dep");
        assert!(repaired.validate().is_empty());
        assert_eq!(repaired.steps[1].dependencies, vec![1]);
    }

    #[test]
    fn repair_fails_when_structurally_unrecoverable() {
        // Non-contiguous numbering cannot be fixed by dropping dependencies.
        let plan = RecoveryPlan {
            steps: vec![step(1, vec![], 1.0), step(3, vec![1], 1.0)],
            critical_path: vec![],
            contingency_plans: vec![],
        };
        assert!(plan.repaired().is_none());
    }
}
