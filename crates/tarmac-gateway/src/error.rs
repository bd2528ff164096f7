use thiserror::Error;

/// Errors raised by the model gateway (§6.1). Transient errors are retried
/// inside the gateway implementation; what reaches the caller here is
/// already a hard failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("model gateway transport error: {0}")]
    Transport(String),

    #[error("model response did not conform to the requested schema: {0}")]
    SchemaMismatch(String),

    #[error("model gateway call exceeded its deadline")]
    Timeout,
}

/// The retrieval service (§6.2) never fails arbitration: callers are
/// expected to log this and proceed with an empty passage list.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval transport error: {0}")]
    Transport(String),

    #[error("retrieval call exceeded its deadline")]
    Timeout,
}
