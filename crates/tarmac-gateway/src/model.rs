//! Model Gateway adapter (§6.1): an opaque callable from prompt + schema to
//! a structured value. The core never parses natural language or drives
//! tokenization itself; it delegates entirely to this trait.

use async_trait::async_trait;
use serde_json::Value;
use tarmac_core::ModelTier;

use crate::error::GatewayError;

#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Complete `prompt` against the model routed for `tier`, returning a
    /// value the caller is responsible for validating against its own
    /// schema expectations (the gateway does best-effort schema coercion
    /// but hard failures raise per §6.1).
    async fn complete(&self, prompt: &str, schema: &Value, tier: ModelTier) -> Result<Value, GatewayError>;
}

/// Deterministic gateway for tests: returns a fixed value per tier,
/// or a configured error, without making any call.
pub struct MockGateway {
    pub fixed_response: Value,
    pub fail_with: Option<String>,
}

impl MockGateway {
    pub fn responding_with(value: Value) -> Self {
        Self {
            fixed_response: value,
            fail_with: None,
        }
    }

    pub fn failing_with(message: impl Into<String>) -> Self {
        Self {
            fixed_response: Value::Null,
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn complete(&self, _prompt: &str, _schema: &Value, _tier: ModelTier) -> Result<Value, GatewayError> {
        if let Some(message) = &self.fail_with {
            return Err(GatewayError::Transport(message.clone()));
        }
        Ok(self.fixed_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn mock_gateway_returns_configured_value() {
        let gateway = MockGateway::responding_with(json!({"confidence": 0.9}));
        let result = gateway.complete("prompt", &json!({}), ModelTier::Fast).await.unwrap();
        assert_eq!(result, json!({"confidence": 0.9}));
    }

    #[tokio::test]
    async fn mock_gateway_can_simulate_hard_failure() {
        let gateway = MockGateway::failing_with("connection reset");
        let err = gateway.complete("prompt", &json!({}), ModelTier::HighCapacity).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
