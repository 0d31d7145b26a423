use utoipa::OpenApi;

/// OpenAPI schema catalogue for the portal API. Served as raw JSON from
/// `/api/openapi.json` for client generation.
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            // Health schemas
            crate::handlers::health::HealthResponse,

            // Authentication schemas
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::auth::LogoutResponse,
            crate::handlers::auth::CheckEmailResponse,
            crate::handlers::auth::OtpResponse,
            crate::handlers::auth::CreatePatientRequest,
            crate::handlers::auth::CreatePatientResponse,
            crate::handlers::auth::CreatedPatient,

            // Session schemas
            crate::handlers::session::SessionResponse,

            // Consultation schemas
            crate::handlers::consultation::AvailabilityResponse,
            crate::handlers::consultation::PresenceResponse,

            // Media schemas
            crate::handlers::upload::UploadResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health endpoints"),
        (name = "authentication", description = "Login, signup and OTP proxy endpoints"),
        (name = "session", description = "Cookie session accessors"),
        (name = "consultation", description = "Doctor presence and call readiness"),
        (name = "media", description = "Consultation recording ingestion"),
    ),
    info(
        title = "HealthDesk Portal API",
        version = "0.1.0",
        description = "Telehealth portal API providing authentication proxying, doctor presence and consultation recording upload.",
        contact(
            name = "HealthDesk Team",
            email = "team@healthdesk.dev",
            url = "https://healthdesk.dev"
        ),
        license(
            name = "AGPL-3.0-only",
            url = "https://github.com/healthdesk/portal-engine/blob/main/LICENSE"
        ),
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "HealthDesk Portal API");
        assert!(doc.components.is_some());
    }
}
