//! Token lookup and Actix-web extractors for admin sessions.
//!
//! # Security
//! - Tokens are read from the `admin_token` cookie first, then from an
//!   `Authorization: Bearer` header
//! - Token values are never logged

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use std::future::{Ready, ready};

use super::session::{SessionClaims, SessionTokens, Stage};
use crate::config::SESSION_COOKIE;
use crate::error::AppError;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Extract a session token: cookie first, bearer header as fallback.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| bearer_token(req))
}

/// Extractor for a fully authenticated admin session.
///
/// Reuses claims already verified by the route guard; otherwise verifies
/// the request's token itself. Fails with `InvalidToken` when no valid
/// `authenticated` token is present.
///
/// ```ignore
/// async fn protected_handler(session: AdminSession) -> impl Responder {
///     // session.claims.login() is the signed-in admin
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub claims: SessionClaims,
}

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<SessionClaims>() {
            if claims.is_authenticated() {
                return ready(Ok(AdminSession {
                    claims: claims.clone(),
                }));
            }
        }

        let tokens = match req.app_data::<web::Data<SessionTokens>>() {
            Some(tokens) => tokens,
            None => {
                return ready(Err(AppError::Configuration(
                    "session token verifier is not registered".to_string(),
                )));
            }
        };

        let result = session_token(req)
            .ok_or(AppError::InvalidToken)
            .and_then(|token| tokens.verify(&token))
            .and_then(|claims| match claims.stage {
                Stage::Authenticated => Ok(AdminSession { claims }),
                Stage::PendingVerification => Err(AppError::InvalidToken),
            });

        ready(result)
    }
}
