//! OpenAPI documentation configuration.

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};

use crate::config::SESSION_COOKIE;
use crate::{api, auth, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Back-office Gate",
        version = "0.1.0",
        description = "Two-stage admin sign-in (password + one-time code) and session checks for the store back-office"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::info,
        // Auth endpoints
        api::auth::login,
        api::auth::request_code,
        api::auth::verify_code,
        api::auth::verify_token,
        api::auth::logout,
        // Admin endpoints
        api::admin::current_session,
    ),
    components(
        schemas(
            error::ErrorResponse,
            api::health::HealthResponse,
            api::health::ServerInfoResponse,
            auth::Stage,
            models::LoginRequest,
            models::LoginResponse,
            models::VerifyCodeRequest,
            models::AuthStepResponse,
            models::SessionUser,
            models::TokenCheckResponse,
            models::SessionInfoResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Admin sign-in and session checks"),
        (name = "Admin", description = "Protected admin API")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer and cookie security schemes.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}
