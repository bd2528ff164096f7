//! RecoverySolution (§3, §4.3) and the composite-score formula (P4).

use serde::{Deserialize, Serialize};

use crate::error::ValidationViolation;
use crate::plan::RecoveryPlan;

pub const SAFETY_WEIGHT: f64 = 0.40;
pub const COST_WEIGHT: f64 = 0.20;
pub const PASSENGER_WEIGHT: f64 = 0.20;
pub const NETWORK_WEIGHT: f64 = 0.20;
pub const COMPOSITE_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverySolution {
    /// 1, 2, or 3 — assigned in final ranked order.
    pub solution_id: u8,
    pub title: String,
    pub description: String,
    pub recommendations: Vec<String>,
    pub safety_score: f64,
    pub cost_score: f64,
    pub passenger_score: f64,
    pub network_score: f64,
    pub composite_score: f64,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub risks: Vec<String>,
    pub confidence: f64,
    pub estimated_duration_minutes: f64,
    pub recovery_plan: RecoveryPlan,
}

/// `0.40*safety + 0.20*cost + 0.20*passenger + 0.20*network`, rounded to at
/// most one decimal place (§3).
pub fn composite_score(safety: f64, cost: f64, passenger: f64, network: f64) -> f64 {
    let raw = SAFETY_WEIGHT * safety + COST_WEIGHT * cost + PASSENGER_WEIGHT * passenger + NETWORK_WEIGHT * network;
    (raw * 10.0).round() / 10.0
}

impl RecoverySolution {
    /// Build a solution with `composite_score` derived from the four
    /// dimension scores, so construction can never drift from the formula.
    pub fn new(
        solution_id: u8,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendations: Vec<String>,
        safety_score: f64,
        cost_score: f64,
        passenger_score: f64,
        network_score: f64,
        pros: Vec<String>,
        cons: Vec<String>,
        risks: Vec<String>,
        confidence: f64,
        estimated_duration_minutes: f64,
        recovery_plan: RecoveryPlan,
    ) -> Self {
        let composite_score = composite_score(safety_score, cost_score, passenger_score, network_score);
        Self {
            solution_id,
            title: title.into(),
            description: description.into(),
            recommendations,
            safety_score,
            cost_score,
            passenger_score,
            network_score,
            composite_score,
            pros,
            cons,
            risks,
            confidence,
            estimated_duration_minutes,
            recovery_plan,
        }
    }

    /// §3/P4: every score in [0,100], `solution_id` in {1,2,3}, and the
    /// composite formula holds within tolerance. §4.3's recovery-plan
    /// invariants (P7) are delegated to `RecoveryPlan::validate`.
    pub fn validate(&self) -> Vec<ValidationViolation> {
        let mut violations = Vec::new();

        for (name, score) in [
            ("safety_score", self.safety_score),
            ("cost_score", self.cost_score),
            ("passenger_score", self.passenger_score),
            ("network_score", self.network_score),
            ("composite_score", self.composite_score),
        ] {
            if !(0.0..=100.0).contains(&score) {
                violations.push(ValidationViolation::new(name, format!("{score} outside [0, 100]")));
            }
        }

        if !(1..=3).contains(&self.solution_id) {
            violations.push(ValidationViolation::new("solution_id", format!("{} outside {{1,2,3}}", self.solution_id)));
        }

        let expected = composite_score(self.safety_score, self.cost_score, self.passenger_score, self.network_score);
        if (self.composite_score - expected).abs() > COMPOSITE_TOLERANCE {
            violations.push(ValidationViolation::new(
                "composite_score",
                format!("composite_score {} deviates from formula result {expected} by more than {COMPOSITE_TOLERANCE}", self.composite_score),
            ));
        }

        for v in self.recovery_plan.validate() {
            violations.push(ValidationViolation::new(format!("recovery_plan.{}", v.field), v.message));
        }

        violations
    }

    /// True iff a binding-constraint violation (encoded as `safety_score ==
    /// 0`) makes this solution ineligible for output (§3/P5).
    pub fn violates_binding_constraint(&self) -> bool {
        self.safety_score == 0.0
    }

    /// Pareto dominance (Glossary): `other` dominates `self` iff `other` is
    /// `>=` on all four dimensions and `>` on at least one.
    pub fn dominated_by(&self, other: &RecoverySolution) -> bool {
        let dims = [
            (self.safety_score, other.safety_score),
            (self.cost_score, other.cost_score),
            (self.passenger_score, other.passenger_score),
            (self.network_score, other.network_score),
        ];
        dims.iter().all(|(a, b)| b >= a) && dims.iter().any(|(a, b)| b > a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::RecoveryStep;
    use crate::agent::AgentName;

    fn trivial_plan() -> RecoveryPlan {
        RecoveryPlan {
            steps: vec![RecoveryStep {
                step_number: 1,
                step_name: "notify".to_string(),
                description: "notify ops".to_string(),
                responsible_agent: AgentName::Network,
                dependencies: vec![],
                estimated_duration_minutes: 5.0,
                automation_possible: true,
                action_type: "notification".to_string(),
                success_criteria: "ops acked".to_string(),
                rollback_procedure: None,
            }],
            critical_path: vec![1],
            contingency_plans: vec![],
        }
    }

    #[test]
    fn composite_formula_matches_spec() {
        assert_eq!(composite_score(100.0, 100.0, 100.0, 100.0), 100.0);
        assert_eq!(composite_score(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(composite_score(80.0, 60.0, 70.0, 90.0), 76.0);
    }

    #[test]
    fn new_never_drifts_from_formula() {
        let s = RecoverySolution::new(
            1, "t", "d", vec![], 80.0, 60.0, 70.0, 90.0, vec![], vec![], vec![], 0.9, 30.0, trivial_plan(),
        );
        assert!(s.validate().is_empty());
        assert_eq!(s.composite_score, 76.0);
    }

    #[test]
    fn tampered_composite_fails_validation() {
        let mut s = RecoverySolution::new(
            1, "t", "d", vec![], 80.0, 60.0, 70.0, 90.0, vec![], vec![], vec![], 0.9, 30.0, trivial_plan(),
        );
        s.composite_score = 50.0;
        assert!(!s.validate().is_empty());
    }

    #[test]
    fn zero_safety_score_marks_constraint_violation() {
        let s = RecoverySolution::new(1, "t", "d", vec![], 0.0, 90.0, 90.0, 90.0, vec![], vec![], vec![], 0.5, 10.0, trivial_plan());
        assert!(s.violates_binding_constraint());
    }

    #[test]
    fn dominance_requires_strictly_better_on_one_axis() {
        let a = RecoverySolution::new(1, "a", "d", vec![], 70.0, 70.0, 70.0, 70.0, vec![], vec![], vec![], 0.8, 10.0, trivial_plan());
        let b = RecoverySolution::new(2, "b", "d", vec![], 80.0, 70.0, 70.0, 70.0, vec![], vec![], vec![], 0.8, 10.0, trivial_plan());
        assert!(a.dominated_by(&b));
        assert!(!b.dominated_by(&a));
    }

    #[test]
    fn equal_solutions_do_not_dominate() {
        let a = RecoverySolution::new(1, "a", "d", vec![], 70.0, 70.0, 70.0, 70.0, vec![], vec![], vec![], 0.8, 10.0, trivial_plan());
        let b = RecoverySolution::new(2, "b", "d", vec![], 70.0, 70.0, 70.0, 70.0, vec![], vec![], vec![], 0.8, 10.0, trivial_plan());
        assert!(!a.dominated_by(&b));
        assert!(!b.dominated_by(&a));
    }
}
