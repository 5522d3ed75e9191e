//! Protected admin API. Every route here sits behind the route guard.

use actix_web::{HttpResponse, get, web};

use crate::auth::AdminSession;
use crate::models::SessionInfoResponse;

/// Configure admin routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(current_session);
}

/// Details of the current admin session.
///
/// GET /api/v1/admin/session
#[utoipa::path(
    get,
    path = "/api/v1/admin/session",
    tag = "Admin",
    responses(
        (status = 200, description = "Current session", body = SessionInfoResponse),
        (status = 401, description = "No valid admin session", body = crate::error::ErrorResponse)
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    )
)]
#[get("/admin/session")]
pub async fn current_session(session: AdminSession) -> HttpResponse {
    let claims = session.claims;

    HttpResponse::Ok().json(SessionInfoResponse {
        issued_at: claims.issued_at().map(|t| t.to_rfc3339()),
        expires_at: claims.expires_at().map(|t| t.to_rfc3339()),
        login: claims.sub,
        stage: claims.stage,
    })
}
