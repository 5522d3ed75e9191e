//! API endpoint modules.

pub mod admin;
pub mod auth;
pub mod health;
pub mod openapi;

pub use admin::configure_routes as configure_admin_routes;
pub use auth::configure_routes as configure_auth_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;

use actix_web::web;

use crate::error::AppError;

/// Mount every API route under `/api/v1`.
///
/// Malformed JSON bodies answer with the regular `ErrorResponse` shape.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let json_config =
        web::JsonConfig::default().error_handler(|err, _req| AppError::from(err).into());

    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config)
            .configure(configure_health_routes)
            .configure(configure_auth_routes)
            .configure(configure_admin_routes),
    );
}
