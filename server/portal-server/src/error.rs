use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Error body every failed request returns. The browser client keys off
/// `success` and `message`; the rest is for operators.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    /// Unique error ID for log correlation
    pub error_id: String,
    /// Error type/code
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Field-specific validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, String>>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Standard success wrapper for endpoints without a bespoke body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Option<HashMap<String, String>>,
    },

    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    /// The upstream data service answered with a failure.
    #[error("{message}")]
    Upstream { message: String },

    /// The upstream data service could not be reached at all.
    #[error("{message}")]
    UpstreamUnreachable { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: None,
        }
    }

    /// Validation failure carrying per-field messages, mirroring the login
    /// form contract.
    pub fn validation_with_fields(
        message: impl Into<String>,
        errors: HashMap<String, String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            errors: Some(errors),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn upstream_unreachable(message: impl Into<String>) -> Self {
        Self::UpstreamUnreachable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::UpstreamUnreachable { .. } => "upstream_unreachable",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Raw causes stay in the log; the response carries the friendly
        // message only.
        error!(
            error_id = %error_id,
            error_type = %self.error_type(),
            status_code = %status_code.as_u16(),
            error = %self,
            "API error occurred"
        );

        let errors = match &self {
            ApiError::Validation { errors, .. } => errors.clone(),
            _ => None,
        };

        let error_response = ApiErrorResponse {
            success: false,
            error_id,
            error_type: self.error_type().to_string(),
            message: self.to_string(),
            errors,
            timestamp: chrono::Utc::now(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal {
            message: error.to_string(),
        }
    }
}

impl From<session_core::SessionError> for ApiError {
    fn from(error: session_core::SessionError) -> Self {
        ApiError::validation(error.to_string())
    }
}

impl From<media_pipeline::MediaError> for ApiError {
    fn from(error: media_pipeline::MediaError) -> Self {
        match &error {
            media_pipeline::MediaError::UploadTransport(_) => ApiError::UpstreamUnreachable {
                message: "Audio ingestion service unavailable".to_string(),
            },
            media_pipeline::MediaError::MissingUploadField(field) => {
                ApiError::bad_request(format!("Missing upload field: {field}"))
            }
            _ => ApiError::upstream(error.to_string()),
        }
    }
}

/// Helper function to create successful API responses
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
