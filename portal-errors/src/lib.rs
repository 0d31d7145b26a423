//! Common error handling for the HealthDesk Portal Engine
//!
//! Every crate in the workspace keeps its own narrow error enum; this crate
//! provides the shared `PortalError` those enums convert into at module
//! boundaries, plus a `Result` alias and a structured logging helper.
//!
//! # Error Categories
//!
//! - **Validation**: input rejected before any network call is made
//! - **Authentication**: invalid credentials or missing/expired session
//! - **Network**: transport-level failures (socket, DNS, TLS)
//! - **Upstream**: non-success responses from the external backend
//! - **Channel**: signaling broker connection and protocol errors
//! - **MediaCapture**: no usable audio source or supported encoding
//! - **MalformedMessage**: unparseable signaling payloads (logged, swallowed
//!   by listeners so the channel stays alive)

use thiserror::Error;

/// Workspace-wide error enum mirroring the portal's failure taxonomy.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Client-side validation failure; blocks submission, never sent upstream
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid credentials or an unusable session
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Transport-level network failure
    #[error("Network error: {0}")]
    Network(String),

    /// The external backend answered with a non-success result
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// Signaling channel (broker) failure
    #[error("Channel error: {0}")]
    Channel(String),

    /// Audio capture or encoding failure
    #[error("Media capture error: {0}")]
    MediaCapture(String),

    /// A signaling payload that could not be parsed
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

impl PortalError {
    /// Short machine-readable tag used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Authentication(_) => "authentication",
            Self::Network(_) => "network",
            Self::Upstream(_) => "upstream",
            Self::Channel(_) => "channel",
            Self::MediaCapture(_) => "media_capture",
            Self::MalformedMessage(_) => "malformed_message",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
            Self::Other(_) => "other",
        }
    }

    /// Whether the caller may retry the failed operation as-is.
    ///
    /// Validation and authentication failures need different input; network,
    /// upstream and channel failures are transient from the portal's point
    /// of view.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Upstream(_) | Self::Channel(_)
        )
    }
}

/// Log an error with its context through tracing.
pub fn log_error(context: &str, error: &PortalError) {
    tracing::error!(
        context = context,
        error_kind = error.kind(),
        error = %error,
        "portal error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(PortalError::Validation("x".into()).kind(), "validation");
        assert_eq!(PortalError::Channel("x".into()).kind(), "channel");
        assert_eq!(
            PortalError::MalformedMessage("x".into()).kind(),
            "malformed_message"
        );
    }

    #[test]
    fn transient_failures_are_retryable() {
        assert!(PortalError::Network("timeout".into()).is_retryable());
        assert!(PortalError::Upstream("502".into()).is_retryable());
        assert!(!PortalError::Validation("bad email".into()).is_retryable());
        assert!(!PortalError::Authentication("expired".into()).is_retryable());
    }
}
