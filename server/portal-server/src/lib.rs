//! HealthDesk Portal Engine - HTTP API server
//!
//! Validating proxy between the browser portal and the external HealthDesk
//! data/auth service: login and signup with local validation and cookie
//! sessions, doctor presence adapters over the sentinel registry protocol,
//! and consultation recording forwarding.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod upstream;
pub mod validation;

pub use error::*;
pub use server::{PortalServer, ServerConfig};

use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Create the main application router with all routes and middleware
pub fn create_app(server: PortalServer) -> Router {
    routes::create_routes()
        .route("/api/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}
