//! Admin sign-in endpoints.
//!
//! 1. POST /auth/login — password check, returns an intermediate token
//! 2. POST /auth/code/request — send a one-time code (Bearer intermediate token)
//! 3. POST /auth/code/verify — check the code, set the `admin_token` cookie
//! 4. GET /auth/verify — report the signed-in admin (cookie or Bearer)
//! 5. POST /auth/logout — clear the `admin_token` cookie

use actix_web::{HttpRequest, HttpResponse, get, post, web};

use crate::auth::{
    Stage, bearer_token, cleared_session_cookie, session_cookie, session_token,
};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthStepResponse, LoginRequest, LoginResponse, SessionUser, TokenCheckResponse,
    VerifyCodeRequest,
};
use crate::services::{AdminAuth, VerifyOutcome};

/// Configure sign-in routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(request_code)
        .service(verify_code)
        .service(verify_token)
        .service(logout);
}

/// Check admin credentials.
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Password accepted, intermediate token issued", body = LoginResponse),
        (status = 401, description = "Invalid login or password", body = crate::error::ErrorResponse),
        (status = 500, description = "Admin credentials not configured", body = crate::error::ErrorResponse)
    )
)]
#[post("/auth/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    auth: web::Data<AdminAuth>,
) -> AppResult<HttpResponse> {
    let token = auth.login(&body.login, &body.password)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token,
        message: "Password accepted. Request a verification code.".to_string(),
    }))
}

/// Send a one-time code to the admin's messaging channel.
///
/// POST /api/v1/auth/code/request
/// Authorization: Bearer <intermediate token>
#[utoipa::path(
    post,
    path = "/api/v1/auth/code/request",
    tag = "Auth",
    responses(
        (status = 200, description = "Code sent", body = AuthStepResponse),
        (status = 400, description = "Token is not an intermediate token", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse),
        (status = 500, description = "Code could not be delivered", body = crate::error::ErrorResponse)
    ),
    security(
        ("bearer" = [])
    )
)]
#[post("/auth/code/request")]
pub async fn request_code(req: HttpRequest, auth: web::Data<AdminAuth>) -> AppResult<HttpResponse> {
    let token = bearer_token(&req).ok_or(AppError::InvalidToken)?;
    auth.request_code(&token).await?;

    Ok(HttpResponse::Ok().json(AuthStepResponse::ok(
        "Verification code sent. It is valid for 5 minutes.",
    )))
}

/// Check a one-time code and start the admin session.
///
/// A wrong, missing or expired code answers 200 with `success: false`.
///
/// POST /api/v1/auth/code/verify
#[utoipa::path(
    post,
    path = "/api/v1/auth/code/verify",
    tag = "Auth",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Code checked; on success the admin_token cookie is set", body = AuthStepResponse),
        (status = 400, description = "Token is not an intermediate token", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid or expired intermediate token", body = crate::error::ErrorResponse)
    )
)]
#[post("/auth/code/verify")]
pub async fn verify_code(
    body: web::Json<VerifyCodeRequest>,
    auth: web::Data<AdminAuth>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    match auth.verify_code(&body.token, &body.code)? {
        VerifyOutcome::Verified { session_token } => Ok(HttpResponse::Ok()
            .cookie(session_cookie(session_token, config.secure_cookies()))
            .json(AuthStepResponse::ok("Signed in"))),
        VerifyOutcome::Rejected(reason) => {
            Ok(HttpResponse::Ok().json(AuthStepResponse::rejected(reason.message())))
        }
    }
}

/// Report the signed-in admin.
///
/// GET /api/v1/auth/verify
#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Session is valid", body = TokenCheckResponse),
        (status = 401, description = "No valid admin session", body = crate::error::ErrorResponse)
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    )
)]
#[get("/auth/verify")]
pub async fn verify_token(req: HttpRequest, auth: web::Data<AdminAuth>) -> AppResult<HttpResponse> {
    let token = session_token(&req).ok_or(AppError::InvalidToken)?;
    let claims = auth.tokens().verify(&token)?;
    if claims.stage != Stage::Authenticated {
        return Err(AppError::InvalidToken);
    }

    Ok(HttpResponse::Ok().json(TokenCheckResponse {
        success: true,
        user: SessionUser {
            login: claims.sub,
            timestamp: claims.iat,
        },
    }))
}

/// End the admin session by clearing the cookie.
///
/// POST /api/v1/auth/logout
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = AuthStepResponse)
    )
)]
#[post("/auth/logout")]
pub async fn logout(config: web::Data<Config>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cleared_session_cookie(config.secure_cookies()))
        .json(AuthStepResponse::ok("Logged out"))
}
