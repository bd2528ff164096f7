//! Where an arbitrated answer is parked after Phase 3 so that a later,
//! independent call to `record_selection` can look it up by disruption id
//! (§4.6). This is a thin read/write lookup, not the checkpoint trail —
//! the checkpoint store is per-thread history, this is "the current
//! arbitrated answer for this disruption".

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tarmac_core::{AnalyzerResponse, ArbitratorOutput};

use crate::error::DecisionsError;

/// Everything `record_selection` needs to build a `DecisionRecord` that it
/// cannot derive from the selection call's own arguments alone.
#[derive(Debug, Clone)]
pub struct StoredArbitration {
    pub output: ArbitratorOutput,
    pub agent_responses: Vec<AnalyzerResponse>,
    pub flight_number: Option<String>,
    pub disruption_type: Option<String>,
    pub disruption_severity: Option<String>,
}

#[async_trait]
pub trait SolutionStore: Send + Sync {
    async fn put(&self, disruption_id: &str, stored: StoredArbitration) -> Result<(), DecisionsError>;
    async fn get(&self, disruption_id: &str) -> Result<Option<StoredArbitration>, DecisionsError>;
}

/// In-memory lookup, matching the teacher's pattern of a `RwLock`-guarded
/// `HashMap` standing in for a managed key/value table in tests.
#[derive(Default)]
pub struct InMemorySolutionStore {
    entries: RwLock<HashMap<String, StoredArbitration>>,
}

impl InMemorySolutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl SolutionStore for InMemorySolutionStore {
    async fn put(&self, disruption_id: &str, stored: StoredArbitration) -> Result<(), DecisionsError> {
        self.entries.write().await.insert(disruption_id.to_string(), stored);
        Ok(())
    }

    async fn get(&self, disruption_id: &str) -> Result<Option<StoredArbitration>, DecisionsError> {
        Ok(self.entries.read().await.get(disruption_id).cloned())
    }
}
