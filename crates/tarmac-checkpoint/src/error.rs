use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("no checkpoint found for thread {thread}{detail}")]
    NotFound { thread: uuid::Uuid, detail: String },

    #[error("conditional write conflict on thread {thread} checkpoint {checkpoint_id} after {attempts} attempts")]
    Conflict {
        thread: uuid::Uuid,
        checkpoint_id: String,
        attempts: u32,
    },

    #[error("object store transport error: {0}")]
    ObjectStoreTransport(String),

    #[error("backend transport error: {0}")]
    BackendTransport(String),
}

/// Outcome of `CheckpointStore::save` (§4.4, §7): a write never raises to
/// the orchestrator, it only ever degrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Ok,
    /// All durable-write retries were exhausted; the record now lives only
    /// in the in-memory shadow for the remainder of the run.
    Degraded,
}
