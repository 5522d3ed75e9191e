//! Domain error types for the admin gate.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Generic message for a failed stage-1 login. Identical for a wrong login
/// and a wrong password.
pub const INVALID_CREDENTIALS_MSG: &str = "Invalid login or password";

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Required server-side configuration is missing or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Stage-1 login/password mismatch
    #[error("{}", INVALID_CREDENTIALS_MSG)]
    InvalidCredentials,

    /// Session token failed signature or expiry checks
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token is valid but carries the wrong stage for this endpoint
    #[error("Invalid token stage: {0}")]
    InvalidStage(String),

    /// Code could not be dispatched through the messaging channel
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::Configuration(detail) => {
                tracing::error!("Configuration error: {}", detail);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "Server configuration error".to_string(),
                )
            }
            AppError::InvalidCredentials => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            AppError::InvalidToken => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                self.to_string(),
            ),
            AppError::InvalidStage(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_STAGE",
                self.to_string(),
            ),
            AppError::Delivery(detail) => {
                tracing::error!("Code delivery failed: {}", detail);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DELIVERY_ERROR",
                    "Failed to deliver verification code".to_string(),
                )
            }
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonPayloadError> for AppError {
    fn from(err: JsonPayloadError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
