use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown role code: {0}")]
    UnknownRoleCode(String),

    #[error("session is missing required field: {0}")]
    MissingField(&'static str),
}

pub type SessionResult<T> = Result<T, SessionError>;

impl From<SessionError> for portal_errors::PortalError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(msg) => portal_errors::PortalError::Validation(msg),
            other => portal_errors::PortalError::Authentication(other.to_string()),
        }
    }
}
