//! E2E tests: stage 1 (password check).

use backoffice_gate::auth::Stage;
use backoffice_gate::config::Environment;
use serde_json::json;

use super::test_helpers::*;

/// Correct credentials → 200 with an intermediate token valid for 10 minutes.
#[actix_rt::test]
async fn test_login_returns_pending_token() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "login": ADMIN_LOGIN, "password": ADMIN_PASSWORD }),
        None,
    )
    .await;
    assert!(session_cookie_of(&resp).is_none(), "stage 1 must not set a cookie");

    let (status, body) = status_and_json(resp).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());

    let claims = ctx.tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.stage, Stage::PendingVerification);
    assert_eq!(claims.login(), ADMIN_LOGIN);
    assert_eq!(claims.exp - claims.iat, 600);
}

/// Wrong login and wrong password produce the same 401 body.
#[actix_rt::test]
async fn test_wrong_field_is_not_revealed() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let wrong_login = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "login": "root", "password": ADMIN_PASSWORD }),
        None,
    )
    .await;
    let (status_a, body_a) = status_and_json(wrong_login).await;

    let wrong_password = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "login": ADMIN_LOGIN, "password": "incorrect" }),
        None,
    )
    .await;
    let (status_b, body_b) = status_and_json(wrong_password).await;

    assert_eq!(status_a, 401);
    assert_eq!(status_b, 401);
    assert_eq!(body_a, body_b);
    assert!(body_a.get("token").is_none());
}

/// Missing admin credential configuration → 500.
#[actix_rt::test]
async fn test_unconfigured_admin_is_server_error() {
    let mut config = test_config(Environment::Development);
    config.admin.password_hash = None;
    let ctx = TestContext::with_config(config);
    let app = create_test_app(&ctx).await;

    let resp = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "login": ADMIN_LOGIN, "password": ADMIN_PASSWORD }),
        None,
    )
    .await;
    let (status, body) = status_and_json(resp).await;

    assert_eq!(status, 500);
    assert!(body["message"].is_string());
}

/// Malformed body → 400, never a token.
#[actix_rt::test]
async fn test_missing_password_field_is_rejected() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = post_json(&app, "/api/v1/auth/login", json!({ "login": ADMIN_LOGIN }), None).await;
    let (status, body) = status_and_json(resp).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("password"));
    assert!(body.get("token").is_none());
}

/// A body that is not JSON at all gets the same error shape.
#[actix_rt::test]
async fn test_non_json_body_is_invalid_input() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = actix_web::test::TestRequest::post()
        .uri("/api/v1/auth/code/verify")
        .insert_header((actix_web::http::header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    let (status, body) = status_and_json(resp).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}
