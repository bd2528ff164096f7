pub mod bucket;
pub mod error;
pub mod sink;
pub mod solution_store;

pub use bucket::{DecisionBucket, InMemoryBucket, StoredObject};
pub use error::DecisionsError;
pub use sink::{BucketStatus, DecisionRecordSink, SelectionOutcome, SelectionStatus};
pub use solution_store::{InMemorySolutionStore, SolutionStore, StoredArbitration};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use tarmac_core::{
        AgentName, AnalyzerPhase, AnalyzerResponse, ArbitratorOutput, RecoveryPlan, RecoveryStep, RecoverySolution,
    };

    fn single_step_plan(description: &str) -> RecoveryPlan {
        RecoveryPlan {
            steps: vec![RecoveryStep {
                step_number: 1,
                step_name: description.to_string(),
                description: description.to_string(),
                responsible_agent: AgentName::Network,
                dependencies: vec![],
                estimated_duration_minutes: 45.0,
                automation_possible: false,
                action_type: "hold".to_string(),
                success_criteria: "weather clears".to_string(),
                rollback_procedure: None,
            }],
            critical_path: vec![1],
            contingency_plans: vec![],
        }
    }

    fn sample_output() -> ArbitratorOutput {
        let solution = RecoverySolution::new(
            1,
            "Delay departure".to_string(),
            "Hold the aircraft 45 minutes".to_string(),
            vec!["hold departure".to_string()],
            90.0,
            70.0,
            80.0,
            85.0,
            vec![],
            vec![],
            vec![],
            0.8,
            45.0,
            single_step_plan("hold departure"),
        );

        ArbitratorOutput {
            solution_options: vec![solution.clone()],
            recommended_solution_id: 1,
            conflicts_identified: vec![],
            conflict_resolutions: vec![],
            safety_overrides: vec![],
            recommendation_evolution: None,
            phases_considered: vec![AnalyzerPhase::Initial, AnalyzerPhase::Revision],
            final_decision: solution.description.clone(),
            recommendations: solution.recommendations.clone(),
            justification: "weather window favors a short hold".to_string(),
            reasoning: "crew rest and weather both clear within the hold window".to_string(),
            confidence: 0.8,
            timestamp: Utc::now(),
            model_used: Some("test-model".to_string()),
            duration_seconds: 1.2,
        }
    }

    fn stored() -> StoredArbitration {
        StoredArbitration {
            output: sample_output(),
            agent_responses: vec![AnalyzerResponse::success(
                AgentName::CrewCompliance,
                AnalyzerPhase::Revision,
                "hold departure",
                0.8,
                vec![],
                "FDP not exceeded",
                1.0,
            )],
            flight_number: Some("EY123".to_string()),
            disruption_type: Some("weather".to_string()),
            disruption_severity: Some("moderate".to_string()),
        }
    }

    #[tokio::test]
    async fn unknown_disruption_is_not_found() {
        let sink = DecisionRecordSink::new(InMemorySolutionStore::arc());
        let err = sink.record_selection("missing", 1, None).await.unwrap_err();
        assert!(matches!(err, DecisionsError::NotFound(_)));
    }

    #[tokio::test]
    async fn selecting_an_unoffered_solution_is_invalid() {
        let solutions = InMemorySolutionStore::arc();
        solutions.put("d-1", stored()).await.unwrap();
        let sink = DecisionRecordSink::new(solutions);

        let err = sink.record_selection("d-1", 9, None).await.unwrap_err();
        assert!(matches!(err, DecisionsError::InvalidSelection { .. }));
    }

    #[tokio::test]
    async fn all_buckets_succeeding_reports_success_and_sets_human_override() {
        let solutions = InMemorySolutionStore::arc();
        solutions.put("d-1", stored()).await.unwrap();
        let primary = InMemoryBucket::arc();
        let sink = DecisionRecordSink::new(solutions).with_bucket("primary", primary.clone());

        let outcome = sink
            .record_selection("d-1", 1, Some("operator agreed with the recommendation".to_string()))
            .await
            .unwrap();

        assert_eq!(outcome.status, SelectionStatus::Success);
        assert!(!outcome.record.human_override);
        assert_eq!(outcome.bucket_status.get("primary"), Some(&BucketStatus::Written));
        assert!(primary.get(&outcome.record.object_key()).await.is_some());
    }

    #[tokio::test]
    async fn one_bucket_failing_yields_partial_success_and_still_writes_the_others() {
        let solutions = InMemorySolutionStore::arc();
        solutions.put("d-1", stored()).await.unwrap();
        let primary = InMemoryBucket::arc();
        let mirror = InMemoryBucket::arc();
        mirror.fail_next_write("region mirror unreachable").await;

        let sink = DecisionRecordSink::new(solutions)
            .with_bucket("primary", primary.clone())
            .with_bucket("mirror", mirror.clone());

        let outcome = sink.record_selection("d-1", 1, None).await.unwrap();

        assert_eq!(outcome.status, SelectionStatus::PartialSuccess);
        assert_eq!(outcome.bucket_status.get("primary"), Some(&BucketStatus::Written));
        assert!(matches!(outcome.bucket_status.get("mirror"), Some(BucketStatus::Failed(_))));
        assert!(primary.get(&outcome.record.object_key()).await.is_some());
    }

    #[tokio::test]
    async fn selecting_a_different_solution_than_recommended_sets_human_override() {
        let mut output = sample_output();
        output.solution_options.push(RecoverySolution::new(
            2,
            "Cancel and rebook".to_string(),
            "Cancel the flight and rebook passengers".to_string(),
            vec!["cancel flight".to_string()],
            60.0,
            40.0,
            50.0,
            55.0,
            vec![],
            vec![],
            vec![],
            0.6,
            180.0,
            single_step_plan("cancel flight"),
        ));

        let solutions = InMemorySolutionStore::arc();
        solutions
            .put(
                "d-1",
                StoredArbitration {
                    output,
                    agent_responses: vec![],
                    flight_number: None,
                    disruption_type: None,
                    disruption_severity: None,
                },
            )
            .await
            .unwrap();

        let sink = DecisionRecordSink::new(solutions);
        let outcome = sink.record_selection("d-1", 2, None).await.unwrap();
        assert!(outcome.record.human_override);
    }
}
