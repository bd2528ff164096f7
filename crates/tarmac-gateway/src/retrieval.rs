//! Retrieval Service adapter (§6.2), an optional dependency of the
//! Arbitrator. Failure never fails arbitration: callers treat any `Err`
//! the same as an empty passage list and proceed.

use async_trait::async_trait;

use crate::error::RetrievalError;

#[async_trait]
pub trait RetrievalService: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<String>, RetrievalError>;
}

pub struct MockRetrieval {
    pub passages: Vec<String>,
    pub fail: bool,
}

impl MockRetrieval {
    pub fn returning(passages: Vec<String>) -> Self {
        Self { passages, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            passages: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl RetrievalService for MockRetrieval {
    async fn retrieve(&self, _query: &str) -> Result<Vec<String>, RetrievalError> {
        if self.fail {
            return Err(RetrievalError::Transport("retrieval backend unreachable".to_string()));
        }
        Ok(self.passages.clone())
    }
}

/// Issue a retrieval call and degrade to an empty passage list on any
/// failure, logging at warn level (§4.3 knowledge-base note).
pub async fn retrieve_or_empty(service: &dyn RetrievalService, query: &str) -> Vec<String> {
    match service.retrieve(query).await {
        Ok(passages) => passages,
        Err(err) => {
            tracing::warn!(error = %err, "retrieval call failed, proceeding without reference passages");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_retrieval_passes_through_passages() {
        let service = MockRetrieval::returning(vec!["passage one".to_string()]);
        let passages = retrieve_or_empty(&service, "query").await;
        assert_eq!(passages, vec!["passage one".to_string()]);
    }

    #[tokio::test]
    async fn failed_retrieval_degrades_to_empty_without_erroring() {
        let service = MockRetrieval::failing();
        let passages = retrieve_or_empty(&service, "query").await;
        assert!(passages.is_empty());
    }
}
