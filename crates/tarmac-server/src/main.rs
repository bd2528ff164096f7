//! Thin axum façade over the orchestrator and decision sink (§6.5).
//!
//! The façade itself, authentication, and rate-limiting are out of the
//! core's scope (§1 Non-goals); this binary exists only to show how the
//! three logical entry points (`invoke`, `status`, `select_solution`) wire
//! onto HTTP. It wires in-memory/mock inbound dependencies (model gateway,
//! operational store, checkpoint backend) since the real ones are external
//! collaborators the core only contracts against (§6).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use tarmac_accessor::{BatchedAccessor, MockStore};
use tarmac_analyzers::AnalyzerRegistry;
use tarmac_arbiter::Arbitrator;
use tarmac_checkpoint::CheckpointStore;
use tarmac_core::TarmacError;
use tarmac_decisions::{DecisionRecordSink, InMemoryBucket, InMemorySolutionStore, StoredArbitration};
use tarmac_gateway::MockGateway;
use tarmac_orchestrator::Orchestrator;

struct AppState {
    orchestrator: Orchestrator,
    decisions: DecisionRecordSink,
}

#[derive(Debug, Deserialize)]
struct InvokeRequest {
    prompt: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct InvokeResponse {
    thread: Uuid,
    session_id: String,
    execution_time_ms: u64,
    output: tarmac_core::ArbitratorOutput,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    detail: String,
    thread: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    thread: Uuid,
    checkpoints: Vec<String>,
    latest_checkpoint_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SelectSolutionRequest {
    disruption_id: String,
    selected_solution_id: u8,
    #[serde(default)]
    rationale: Option<String>,
}

#[derive(Debug, Serialize)]
struct SelectSolutionResponse {
    status: &'static str,
    bucket_status: std::collections::HashMap<String, String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let gateway = Arc::new(MockGateway::responding_with(serde_json::json!({
        "recommendation": "monitor and hold for further data",
        "confidence": 0.5,
        "reasoning": "no model gateway configured for this deployment",
        "binding_constraints": [],
    })));
    let accessor = Arc::new(BatchedAccessor::new(MockStore::new().arc()));
    let checkpoints = Arc::new(CheckpointStore::in_memory());
    let registry = AnalyzerRegistry::standard();
    let arbitrator = Arbitrator::new(Arc::clone(&gateway) as Arc<dyn tarmac_gateway::ModelGateway>);
    let orchestrator = Orchestrator::new(registry, checkpoints, accessor, gateway, arbitrator);

    let decisions = DecisionRecordSink::new(InMemorySolutionStore::arc()).with_bucket("primary", InMemoryBucket::arc());

    let state = Arc::new(AppState { orchestrator, decisions });

    let app = Router::new()
        .route("/health", get(health))
        .route("/invoke", post(invoke))
        .route("/status/{thread}", get(status))
        .route("/select_solution", post(select_solution))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3080".to_string());
    let addr = format!("0.0.0.0:{port}");

    tracing::info!(%addr, "tarmac-server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health() -> &'static str {
    "ok"
}

async fn invoke(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let started = std::time::Instant::now();

    let result = state
        .orchestrator
        .handle_disruption(&req.prompt, req.session_id.clone())
        .await
        .map_err(to_http_error)?;

    state
        .decisions
        .solutions()
        .put(
            &result.thread.to_string(),
            StoredArbitration {
                output: result.output.clone(),
                agent_responses: result.collation2.responses.values().cloned().collect(),
                flight_number: None,
                disruption_type: None,
                disruption_severity: None,
            },
        )
        .await
        .map_err(|err| {
            to_http_error(TarmacError::Internal(err.to_string()))
        })?;

    Ok(Json(InvokeResponse {
        thread: result.thread,
        session_id: req.session_id.unwrap_or_else(|| result.thread.to_string()),
        execution_time_ms: started.elapsed().as_millis() as u64,
        output: result.output,
    }))
}

async fn status(
    State(state): State<Arc<AppState>>,
    Path(thread): Path<Uuid>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let records = state
        .orchestrator
        .checkpoint_store()
        .list(thread)
        .await
        .map_err(|err| to_http_error(TarmacError::Internal(err.to_string())))?;

    if records.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "NOT_FOUND".to_string(),
                detail: format!("no checkpoints recorded for thread {thread}"),
                thread: Some(thread),
            }),
        ));
    }

    Ok(Json(StatusResponse {
        thread,
        latest_checkpoint_id: records.last().map(|r| r.checkpoint_id.clone()),
        checkpoints: records.into_iter().map(|r| r.checkpoint_id).collect(),
    }))
}

async fn select_solution(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectSolutionRequest>,
) -> Result<Json<SelectSolutionResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome = state
        .decisions
        .record_selection(&req.disruption_id, req.selected_solution_id, req.rationale)
        .await
        .map_err(|err| match &err {
            tarmac_decisions::DecisionsError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "NOT_FOUND".to_string(),
                    detail: err.to_string(),
                    thread: None,
                }),
            ),
            tarmac_decisions::DecisionsError::InvalidSelection { .. } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "INVALID".to_string(),
                    detail: err.to_string(),
                    thread: None,
                }),
            ),
            tarmac_decisions::DecisionsError::StoreTransport(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "INTERNAL".to_string(),
                    detail: err.to_string(),
                    thread: None,
                }),
            ),
        })?;

    let status = match outcome.status {
        tarmac_decisions::SelectionStatus::Success => "SUCCESS",
        tarmac_decisions::SelectionStatus::PartialSuccess => "PARTIAL_SUCCESS",
    };

    let bucket_status = outcome
        .bucket_status
        .into_iter()
        .map(|(name, status)| {
            let rendered = match status {
                tarmac_decisions::BucketStatus::Written => "written".to_string(),
                tarmac_decisions::BucketStatus::Failed(reason) => format!("failed: {reason}"),
            };
            (name, rendered)
        })
        .collect();

    Ok(Json(SelectSolutionResponse { status, bucket_status }))
}

fn to_http_error(err: TarmacError) -> (StatusCode, Json<ErrorResponse>) {
    let (code, kind, thread) = match &err {
        TarmacError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", None),
        TarmacError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
        TarmacError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", None),
        TarmacError::Unavailable { thread } => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", Some(*thread)),
        TarmacError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", None),
        TarmacError::PartialSuccess { .. } => (StatusCode::MULTI_STATUS, "PARTIAL_SUCCESS", None),
    };

    (
        code,
        Json(ErrorResponse {
            error: kind.to_string(),
            detail: err.to_string(),
            thread,
        }),
    )
}
