//! REST API server for the stock orchestrator
//!
//! Exposes the routing core via HTTP:
//! - `POST /orchestrate` — classify a message and dispatch it
//! - `GET  /`            — status, recognized intents, endpoint listing
//! - `GET  /health`      — per-agent reachability report

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::classifier::IntentClassifier;
use crate::dispatcher::Dispatcher;
use crate::error::OrchestrationError;
use crate::health::HealthAggregator;
use crate::models::{Intent, OrchestratorResponse, UserRequest};

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub classifier: Arc<IntentClassifier>,
    pub dispatcher: Arc<Dispatcher>,
    pub health: Arc<HealthAggregator>,
}

/// =============================
/// Error Payload
/// =============================

#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: String,
}

/// Agent-unavailable maps to 503; everything else is an internal error.
fn error_response(err: OrchestrationError) -> (StatusCode, Json<ErrorDetail>) {
    let status = if err.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ErrorDetail {
            detail: err.to_string(),
        }),
    )
}

/// =============================
/// Orchestration Endpoint
/// =============================

async fn orchestrate(
    State(state): State<ApiState>,
    Json(request): Json<UserRequest>,
) -> Result<Json<OrchestratorResponse>, (StatusCode, Json<ErrorDetail>)> {
    let request_id = Uuid::new_v4();
    info!(%request_id, message = %request.message, "Received orchestration request");

    let intent = state.classifier.classify(&request.message);
    info!(%request_id, intent = %intent, "Intent classified");

    match state.dispatcher.dispatch(intent, &request.message).await {
        Ok(response) => {
            info!(%request_id, agent = %response.agent_used, "Request served");
            Ok(Json(response))
        }
        Err(e) => {
            warn!(%request_id, "Dispatch failed: {}", e);
            Err(error_response(e))
        }
    }
}

/// =============================
/// Status & Health Endpoints
/// =============================

async fn root() -> Json<serde_json::Value> {
    let intents: Vec<&str> = Intent::ALL.iter().map(|i| i.as_str()).collect();

    Json(serde_json::json!({
        "status": "Stock Orchestrator running",
        "available_intents": intents,
        "endpoints": {
            "orchestrate": "/orchestrate",
            "health": "/health",
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let report = state.health.health().await;

    Json(serde_json::json!({
        "orchestrator": "healthy",
        "experts": report.experts,
        "overall_status": if report.all_healthy { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/orchestrate", post(orchestrate))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
