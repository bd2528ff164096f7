use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecisionsError {
    #[error("no stored arbitrator output for disruption {0}")]
    NotFound(String),

    #[error("selected_solution_id {selected} is not among the solution ids offered for disruption {disruption_id}: {available:?}")]
    InvalidSelection {
        disruption_id: String,
        selected: u8,
        available: Vec<u8>,
    },

    #[error("solution store transport error: {0}")]
    StoreTransport(String),
}
