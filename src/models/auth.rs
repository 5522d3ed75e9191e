//! Request and response bodies of the admin sign-in endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Stage;

/// Stage-1 credentials.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Stage-1 success: carries the intermediate bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub message: String,
}

/// Stage-2 verification input.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyCodeRequest {
    /// Intermediate token from the login step
    pub token: String,
    pub code: String,
}

/// Outcome body used by code request and code verification.
///
/// `success: false` with status 200 is a user-correctable code problem.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthStepResponse {
    pub success: bool,
    pub message: String,
}

impl AuthStepResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Signed-in admin as reported by the token check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub login: String,
    /// Token issuance time, Unix seconds
    pub timestamp: i64,
}

/// Token check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenCheckResponse {
    pub success: bool,
    pub user: SessionUser,
}

/// Current session details for protected admin API callers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionInfoResponse {
    pub login: String,
    pub stage: Stage,
    /// RFC 3339
    pub issued_at: Option<String>,
    /// RFC 3339
    pub expires_at: Option<String>,
}
