//! E2E tests: route guard on admin pages and the admin API.

use actix_web::{http::header, test};
use backoffice_gate::auth::Stage;
use backoffice_gate::config::SESSION_COOKIE;
use chrono::{Duration, Utc};

use super::test_helpers::*;

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Admin API without a session → 401 JSON.
#[actix_rt::test]
async fn test_admin_api_requires_session() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get_with_cookie(&app, "/api/v1/admin/session", None).await;
    let (status, body) = status_and_json(resp).await;

    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

/// A full session via cookie or Bearer header reaches the admin API.
#[actix_rt::test]
async fn test_admin_api_accepts_cookie_and_bearer() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;
    let session = sign_in(&app, &ctx).await;

    let resp = get_with_cookie(&app, "/api/v1/admin/session", Some(&session)).await;
    let (status, body) = status_and_json(resp).await;
    assert_eq!(status, 200);
    assert_eq!(body["login"], ADMIN_LOGIN);
    assert_eq!(body["stage"], "authenticated");
    assert!(body["expires_at"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/session")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", session)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

/// An intermediate token never opens the admin area.
#[actix_rt::test]
async fn test_pending_token_is_denied() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;
    let pending = login_ok(&app).await;

    let resp = get_with_cookie(&app, "/api/v1/admin/session", Some(&pending)).await;
    assert_eq!(resp.status(), 401);

    let resp = get_with_cookie(&app, "/admin", Some(&pending)).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp).as_deref(), Some("/login?next=%2Fadmin"));
}

/// Admin pages without a session redirect to the login entry.
#[actix_rt::test]
async fn test_admin_page_redirects_to_login() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get_with_cookie(&app, "/admin/orders?page=2", None).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp).as_deref(),
        Some("/login?next=%2Fadmin%2Forders%3Fpage%3D2")
    );
    assert!(session_cookie_of(&resp).is_none());
}

/// A forged cookie is cleared on the way to the login page.
#[actix_rt::test]
async fn test_invalid_cookie_is_cleared() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get_with_cookie(&app, "/admin", Some("not-a-jwt")).await;

    assert_eq!(resp.status(), 302);
    let cleared = session_cookie_of(&resp).expect("cleared cookie");
    assert_eq!(cleared.name(), SESSION_COOKIE);
    assert_eq!(cleared.value(), "");
}

/// A stale cookie at the login entry is cleared; the login page still renders.
#[actix_rt::test]
async fn test_invalid_cookie_is_cleared_at_login_entry() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get_with_cookie(&app, "/login", Some("garbage")).await;

    assert_eq!(resp.status(), 200);
    let cleared = session_cookie_of(&resp).expect("cleared cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(
        cleared.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO)
    );
}

/// A pending token at the login entry is left alone.
#[actix_rt::test]
async fn test_pending_token_at_login_entry_is_kept() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;
    let pending = login_ok(&app).await;

    let resp = get_with_cookie(&app, "/login", Some(&pending)).await;

    assert_eq!(resp.status(), 200);
    assert!(session_cookie_of(&resp).is_none());
}

/// Percent-encoding a protected path does not get around the guard.
#[actix_rt::test]
async fn test_encoded_protected_paths_are_guarded() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get_with_cookie(&app, "/%61dmin/orders", None).await;
    assert_eq!(resp.status(), 302);
    assert!(location(&resp).unwrap().starts_with("/login?next="));

    let resp = get_with_cookie(&app, "/%61dmin", None).await;
    assert_eq!(resp.status(), 302);

    let resp = get_with_cookie(&app, "/api/v1/%61dmin/session", None).await;
    let (status, body) = status_and_json(resp).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let session = sign_in(&app, &ctx).await;
    let resp = get_with_cookie(&app, "/%61dmin/orders", Some(&session)).await;
    assert_eq!(resp.status(), 200);
}

/// A session older than one day is rejected.
#[actix_rt::test]
async fn test_expired_session_is_rejected() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let stale = ctx
        .tokens
        .mint_at(
            ADMIN_LOGIN,
            Stage::Authenticated,
            Utc::now() - Duration::days(1) - Duration::minutes(1),
        )
        .unwrap();

    let resp = get_with_cookie(&app, "/api/v1/admin/session", Some(&stale)).await;
    assert_eq!(resp.status(), 401);
    assert!(session_cookie_of(&resp).is_some());

    let resp = get_with_cookie(&app, "/admin", Some(&stale)).await;
    assert_eq!(resp.status(), 302);
}

/// Authenticated admins skip the login page.
#[actix_rt::test]
async fn test_login_page_forwards_signed_in_admin() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get_with_cookie(&app, "/login", None).await;
    assert_eq!(resp.status(), 200);

    let session = sign_in(&app, &ctx).await;
    let resp = get_with_cookie(&app, "/login", Some(&session)).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp).as_deref(), Some("/admin"));

    let resp = get_with_cookie(&app, "/admin/orders", Some(&session)).await;
    assert_eq!(resp.status(), 200);
}

/// Public routes pass through untouched.
#[actix_rt::test]
async fn test_public_routes_are_open() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get_with_cookie(&app, "/api/v1/health", Some("garbage")).await;

    assert_eq!(resp.status(), 200);
    assert!(session_cookie_of(&resp).is_none());
}
