use thiserror::Error;

/// Errors that can propagate out of arbitration (§7: model-call errors,
/// after retries, become `INTERNAL` at the orchestrator boundary — this
/// enum is what the orchestrator converts).
#[derive(Debug, Error)]
pub enum ArbiterError {
    #[error("model gateway call failed: {0}")]
    Gateway(#[from] tarmac_gateway::GatewayError),

    #[error("model returned a response that could not be parsed into candidate solutions: {0}")]
    MalformedModelOutput(String),
}
