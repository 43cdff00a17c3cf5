//! Health check endpoint handlers.
//!
//! Provides health endpoints for monitoring and load balancers. None of
//! them require authentication.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ldp_persistence::core::ResourceStorage;
use serde::Serialize;
use tracing::{debug, warn};

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub backend: &'static str,
    pub timestamp: String,
}

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET /health`
///
/// # Response
///
/// - `200 OK` - `{"status": "healthy", "backend": .., "timestamp": ..}`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: ResourceStorage,
{
    debug!("Processing health check request");

    let health_response = HealthStatus {
        status: "healthy",
        backend: state.storage().backend_name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(health_response)).into_response()
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET /_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Probes the storage backend.
///
/// # HTTP Request
///
/// `GET /_readiness`
///
/// # Response
///
/// - `200 OK` - Storage answered
/// - `503 Service Unavailable` - Storage failed
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: ResourceStorage,
{
    debug!("Processing readiness check request");

    let backend_name = state.storage().backend_name();
    let (status, storage) = match state.storage().ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!(backend = backend_name, error = %e, "Storage readiness probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let response = serde_json::json!({
        "status": if status == StatusCode::OK { "ready" } else { "not ready" },
        "backend": backend_name,
        "checks": {
            "storage": storage
        }
    });

    (status, Json(response)).into_response()
}
