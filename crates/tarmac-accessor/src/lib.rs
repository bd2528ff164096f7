//! Bounded-batch operational-data accessor (§4.5).
//!
//! Analyzers read flight, crew, maintenance, and passenger data exclusively
//! through this crate; it never writes.

pub mod accessor;
pub mod error;
pub mod store;

pub use accessor::{BatchOutcome, BatchedAccessor, DEFAULT_BATCH_SIZE};
pub use error::AccessorError;
pub use store::{MockStore, OperationalStore, RawBatchResult};
