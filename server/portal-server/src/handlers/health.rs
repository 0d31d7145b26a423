use crate::server::PortalServer;
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status
    #[schema(example = "healthy")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
    /// API version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Server name
    pub server: String,
}

/// Liveness probe.
pub async fn health_check(State(server): State<PortalServer>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        server: server.config.name.clone(),
    })
}
