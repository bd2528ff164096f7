use thiserror::Error;

/// Errors from the underlying operational store transport. Residual
/// unprocessed keys after the retry budget are not an error (§4.5) — they
/// are reported via `BatchOutcome::unprocessed_keys` instead.
#[derive(Debug, Error)]
pub enum AccessorError {
    #[error("operational store transport error: {0}")]
    Transport(String),
}
