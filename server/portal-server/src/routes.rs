use crate::{
    handlers::{auth, consultation, health, session, upload},
    middleware::require_session,
    server::PortalServer,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

/// Route path constants, grouped the way the browser client calls them.
pub mod paths {
    pub mod health {
        pub const HEALTH: &str = "/health";
    }

    pub mod auth {
        pub const LOGIN: &str = "/api/auth/login";
        pub const CHECK_EMAIL: &str = "/api/auth/check-email";
        pub const SEND_OTP: &str = "/api/auth/send-otp";
        pub const VERIFY_OTP: &str = "/api/auth/verify-otp";
        pub const CREATE_PATIENT: &str = "/api/auth/create-patient";
        pub const LOGOUT: &str = "/api/logout";
    }

    pub mod session {
        pub const SESSION: &str = "/api/session";
    }

    pub mod consultation {
        pub const AVAILABILITY: &str = "/api/consultation/availability";
    }

    pub mod media {
        pub const UPLOAD_AUDIO: &str = "/api/upload-audio";
    }
}

/// Health and auth routes, reachable without a session.
pub fn public_routes() -> Router<PortalServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::auth::LOGIN, post(auth::login))
        .route(paths::auth::CHECK_EMAIL, get(auth::check_email))
        .route(paths::auth::SEND_OTP, get(auth::send_otp))
        .route(paths::auth::VERIFY_OTP, get(auth::verify_otp))
        .route(paths::auth::CREATE_PATIENT, post(auth::create_patient))
        .route(paths::auth::LOGOUT, post(auth::logout))
        .route(paths::session::SESSION, get(session::get_session))
}

/// Routes behind the session guard: consultation presence and the
/// recording forwarder.
pub fn protected_routes() -> Router<PortalServer> {
    Router::new()
        .route(
            paths::consultation::AVAILABILITY,
            get(consultation::get_availability)
                .post(consultation::announce_availability)
                .patch(consultation::refresh_availability),
        )
        .route(paths::media::UPLOAD_AUDIO, post(upload::upload_audio))
        .layer(from_fn(require_session))
}

pub fn create_routes() -> Router<PortalServer> {
    public_routes().merge(protected_routes())
}
