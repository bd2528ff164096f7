//! Inbound-dependency adapters the orchestrator and arbitrator call
//! through: the Model Gateway (§6.1, required) and the Retrieval Service
//! (§6.2, optional).

pub mod error;
pub mod model;
pub mod retrieval;

pub use error::{GatewayError, RetrievalError};
pub use model::{MockGateway, ModelGateway};
pub use retrieval::{retrieve_or_empty, MockRetrieval, RetrievalService};
