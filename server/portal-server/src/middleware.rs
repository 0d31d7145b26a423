//! Session cookie plumbing and route protection.

use crate::error::ApiError;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use session_core::{cookies, Session};
use time::Duration;
use tracing::warn;

/// Read the portal session out of the request cookies. Absent cookies
/// become `None` fields; `Session::is_authenticated` decides validity.
pub fn session_from_jar(jar: &CookieJar) -> Session {
    let get = |name: &str| jar.get(name).map(|c| c.value().to_string());
    Session {
        token: get(cookies::TOKEN),
        user_name: get(cookies::USER_NAME),
        email: get(cookies::EMAIL),
        phone: get(cookies::PHONE),
        role: get(cookies::ROLE),
    }
}

/// The HTTP-only session token cookie, 12 hour lifetime.
pub fn token_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((cookies::TOKEN, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::seconds(cookies::TOKEN_MAX_AGE_SECS))
        .build()
}

/// Plain (client-readable) session cookie for display fields.
pub fn plain_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value)).path("/").build()
}

/// Expired cookie used by logout; max-age 0 removes it client-side.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Clear every session cookie.
pub fn clear_session(mut jar: CookieJar) -> CookieJar {
    for name in cookies::ALL {
        jar = jar.add(removal_cookie(name));
    }
    jar
}

/// Guard for protected route groups: a request without a token cookie, or
/// with a blank userName, is rejected before the handler runs.
pub async fn require_session(
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = session_from_jar(&jar);
    if !session.is_authenticated() {
        warn!(path = %request.uri().path(), "unauthenticated request rejected");
        return Err(ApiError::authentication("Authentication required"));
    }
    Ok(next.run(request).await)
}
