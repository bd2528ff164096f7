//! Thread-scoped checkpoint persistence (§4.4).
//!
//! The orchestrator checkpoints state at phase boundaries so a thread can
//! be resumed after a crash or restart. Writes never raise to the caller;
//! they degrade to an in-memory shadow instead (§7).

pub mod backend;
pub mod error;
pub mod object_store;
pub mod store;

pub use backend::{CheckpointBackend, InMemoryBackend, PutOutcome, StoredCheckpoint};
pub use error::{CheckpointError, SaveOutcome};
pub use object_store::{InMemoryObjectStore, ObjectStore};
pub use store::CheckpointStore;
