use crate::error::{ApiError, ApiResult};
use crate::middleware::session_from_jar;
use crate::server::PortalServer;
use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use presence_registry::Availability;
use serde::{Deserialize, Serialize};
use session_core::{validation, Role};
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub doctor: Option<String>,
}

/// Availability as the browser sees it. The registry's sentinel status
/// codes never leave the adapter.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub success: bool,
    pub doctor: String,
    pub available: bool,
    pub status: String,
}

fn availability_label(availability: Availability) -> &'static str {
    match availability {
        Availability::Available => "available",
        Availability::Unavailable => "unavailable",
        Availability::Unknown => "unknown",
    }
}

/// Doctor availability lookup used by the patient consultation page.
/// Registry failures answer as "unavailable"; the patient side fails
/// closed.
pub async fn get_availability(
    State(server): State<PortalServer>,
    jar: CookieJar,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let doctor = query
        .doctor
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::validation("doctor is required"))?;
    validation::validate_email(&doctor)?;

    let session = session_from_jar(&jar);
    let token = session.token().map_err(|_| ApiError::authentication("Authentication required"))?;

    let availability = server.registry.get_availability(&doctor, token).await;
    info!(
        doctor = %logger_phi::PhiRedactor::default().redact(&doctor),
        status = availability_label(availability),
        "availability checked"
    );

    Ok(Json(AvailabilityResponse {
        success: true,
        doctor,
        available: availability.is_available(),
        status: availability_label(availability).to_string(),
    }))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PresenceResponse {
    pub success: bool,
    pub message: String,
}

/// Doctor marks themselves reachable when their dashboard comes up.
pub async fn announce_availability(
    State(server): State<PortalServer>,
    jar: CookieJar,
) -> ApiResult<Json<PresenceResponse>> {
    let (email, token) = doctor_identity(&jar)?;

    server
        .registry
        .set_available(&email, &token)
        .await
        .map_err(|e| ApiError::upstream(e.to_string()))?;

    info!("doctor announced available");
    Ok(Json(PresenceResponse {
        success: true,
        message: "Availability set".to_string(),
    }))
}

/// Heartbeat refresh of the doctor's presence entry.
pub async fn refresh_availability(
    State(server): State<PortalServer>,
    jar: CookieJar,
) -> ApiResult<Json<PresenceResponse>> {
    let (email, token) = doctor_identity(&jar)?;

    server
        .registry
        .update_availability(&email, &token)
        .await
        .map_err(|e| ApiError::upstream(e.to_string()))?;

    Ok(Json(PresenceResponse {
        success: true,
        message: "Availability updated".to_string(),
    }))
}

fn doctor_identity(jar: &CookieJar) -> ApiResult<(String, String)> {
    let session = session_from_jar(jar);
    let role = session
        .role()
        .map_err(|_| ApiError::authentication("Authentication required"))?;
    if role != Role::Doctor {
        return Err(ApiError::authentication(
            "Only doctors can publish availability",
        ));
    }
    let token = session
        .token()
        .map_err(|_| ApiError::authentication("Authentication required"))?
        .to_string();
    let email = session
        .email
        .clone()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::authentication("Authentication required"))?;
    Ok((email, token))
}
