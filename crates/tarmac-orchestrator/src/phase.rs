//! Phase fan-out/fan-in (§4.1, §5 — P1 phase barrier): run all seven
//! analyzers concurrently, wait for every one to settle (success, timeout,
//! or error), and assemble the phase's `Collation`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use tarmac_accessor::BatchedAccessor;
use tarmac_analyzers::{AnalyzerRegistry, PriorPhaseContext};
use tarmac_core::{AgentName, AnalyzerPhase, AnalyzerResponse, Collation};
use tarmac_gateway::ModelGateway;
use uuid::Uuid;

/// Run every analyzer in `registry` concurrently under its own supervisor
/// deadline, and return the phase's `Collation` once all seven have
/// settled. No Phase 2 call may begin until this returns for Phase 1
/// (the barrier is structural: the caller simply doesn't invoke Phase 2
/// until this future resolves).
pub async fn run_phase(
    phase: AnalyzerPhase,
    thread: Uuid,
    prompt: &str,
    prior: Option<&Collation>,
    registry: &AnalyzerRegistry,
    gateway: Arc<dyn ModelGateway>,
    accessor: Arc<BatchedAccessor>,
) -> Collation {
    let prior_context = prior.map(|c| PriorPhaseContext {
        per_agent: c.responses.clone(),
    });

    let expected: Vec<AgentName> = AgentName::ALL.to_vec();
    let mut set = JoinSet::new();

    for analyzer in registry.all() {
        let agent = analyzer.agent_name();
        let deadline = Duration::from_secs(agent.deadline_seconds());
        let input = tarmac_analyzers::AnalyzerInput {
            prompt_envelope: prompt.to_string(),
            phase,
            thread,
            model: Arc::clone(&gateway),
            data_accessor: Arc::clone(&accessor),
            prior_phase: prior_context.clone(),
        };

        set.spawn(async move {
            let started = Instant::now();
            match tokio::time::timeout(deadline, analyzer.run(input)).await {
                Ok(response) => response,
                Err(_) => {
                    tracing::warn!(agent = %agent, phase = ?phase, "analyzer exceeded its supervisor deadline");
                    AnalyzerResponse::timed_out(agent, phase, started.elapsed().as_secs_f64())
                }
            }
        });
    }

    let mut by_agent: HashMap<AgentName, AnalyzerResponse> = HashMap::new();
    while let Some(result) = set.join_next().await {
        match result {
            Ok(response) => {
                by_agent.insert(response.agent_name, response);
            }
            Err(join_error) => {
                // A panicked or cancelled supervisor task: we can't recover
                // which agent it was from the JoinError alone, so fill in
                // the gap once we know which agents never reported back.
                tracing::error!(error = %join_error, phase = ?phase, "analyzer supervisor task did not complete");
            }
        }
    }

    for agent in &expected {
        by_agent.entry(*agent).or_insert_with(|| {
            AnalyzerResponse::errored(*agent, phase, "analyzer supervisor task did not complete", 0.0)
        });
    }

    Collation::new(phase, by_agent.into_values().collect())
}
