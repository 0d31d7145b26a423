use crate::middleware::session_from_jar;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use session_core::Session;
use utoipa::ToSchema;

/// Current-session response, straight from the request cookies.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub session: Session,
}

/// Cookie accessor the browser uses to hydrate its auth context.
pub async fn get_session(jar: CookieJar) -> Json<SessionResponse> {
    let session = session_from_jar(&jar);
    Json(SessionResponse {
        authenticated: session.is_authenticated(),
        session,
    })
}
