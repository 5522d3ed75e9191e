//! Route guard for the admin area.
//!
//! Admits protected requests only with a valid `authenticated` session token
//! (cookie first, Bearer header as fallback). Pages redirect to the login
//! entry; API routes answer 401. A token that fails verification also gets
//! its cookie cleared. An authenticated admin opening the login entry is
//! sent on to the dashboard.

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse, web};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;
use tracing::{debug, warn};

use crate::auth::{SessionClaims, SessionTokens, Stage, cleared_session_cookie, session_token};
use crate::config::Config;
use crate::error::ErrorResponse;

/// Path layout the guard enforces.
#[derive(Debug, Clone)]
pub struct GuardPaths {
    /// Prefix of protected JSON API routes
    pub api_prefix: String,
    /// Prefix of protected pages
    pub page_prefix: String,
    /// Login entry point
    pub login_path: String,
    /// Where an authenticated admin lands
    pub dashboard_path: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            api_prefix: "/api/v1/admin".to_string(),
            page_prefix: "/admin".to_string(),
            login_path: "/login".to_string(),
            dashboard_path: "/admin".to_string(),
        }
    }
}

/// What kind of route a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    ProtectedApi,
    ProtectedPage,
    LoginEntry,
    Public,
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl GuardPaths {
    pub fn classify(&self, path: &str) -> RouteKind {
        if under_prefix(path, &self.api_prefix) {
            RouteKind::ProtectedApi
        } else if under_prefix(path, &self.page_prefix) {
            RouteKind::ProtectedPage
        } else if path == self.login_path
            || path.strip_suffix('/') == Some(self.login_path.as_str())
        {
            RouteKind::LoginEntry
        } else {
            RouteKind::Public
        }
    }

    /// Login URL remembering where the admin was heading.
    pub fn login_redirect(&self, path: &str, query: &str) -> String {
        let target = if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        };
        format!("{}?next={}", self.login_path, urlencoding::encode(&target))
    }
}

/// Session state observed on a request.
#[derive(Debug)]
enum SessionState {
    Missing,
    Invalid,
    Pending,
    Authenticated(SessionClaims),
}

fn session_state(req: &ServiceRequest, tokens: Option<&SessionTokens>) -> SessionState {
    let Some(token) = session_token(req.request()) else {
        return SessionState::Missing;
    };
    let Some(tokens) = tokens else {
        warn!("Route guard has no session verifier registered; denying");
        return SessionState::Invalid;
    };

    match tokens.verify(&token) {
        Ok(claims) => match claims.stage {
            Stage::Authenticated => SessionState::Authenticated(claims),
            Stage::PendingVerification => SessionState::Pending,
        },
        Err(_) => SessionState::Invalid,
    }
}

/// Route guard middleware factory.
pub struct RouteGuard {
    paths: Rc<GuardPaths>,
}

impl RouteGuard {
    pub fn new(paths: GuardPaths) -> Self {
        Self {
            paths: Rc::new(paths),
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(GuardPaths::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardMiddleware {
            service,
            paths: self.paths.clone(),
        }))
    }
}

/// Route guard middleware service.
pub struct RouteGuardMiddleware<S> {
    service: S,
    paths: Rc<GuardPaths>,
}

impl<S, B> Service<ServiceRequest> for RouteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let kind = self.paths.classify(&decoded_path(req.path()));

        if kind == RouteKind::Public {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        let tokens = req.app_data::<web::Data<SessionTokens>>().cloned();
        let secure = req
            .app_data::<web::Data<Config>>()
            .map(|c| c.secure_cookies())
            .unwrap_or(true);
        let state = session_state(&req, tokens.as_ref().map(|t| t.get_ref()));

        let mut clear_cookie = false;
        let denial = match (kind, state) {
            (RouteKind::LoginEntry, SessionState::Authenticated(_)) => {
                debug!("Authenticated admin at login entry, forwarding to dashboard");
                Some(
                    HttpResponse::Found()
                        .append_header((header::LOCATION, self.paths.dashboard_path.clone()))
                        .finish(),
                )
            }
            (RouteKind::LoginEntry, state) => {
                clear_cookie = matches!(state, SessionState::Invalid);
                None
            }
            (_, SessionState::Authenticated(claims)) => {
                req.extensions_mut().insert(claims);
                None
            }
            (kind, state) => {
                let invalid = matches!(state, SessionState::Invalid);
                debug!(path = %req.path(), ?state, "Route guard denied request");
                Some(deny(&self.paths, kind, &req, invalid, secure))
            }
        };

        match denial {
            Some(response) => {
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
            None => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let mut res = fut.await?;
                    if clear_cookie {
                        res.response_mut()
                            .add_cookie(&cleared_session_cookie(secure))?;
                    }
                    Ok(res.map_into_left_body())
                })
            }
        }
    }
}

/// Percent-decoded request path, as the router matches it.
fn decoded_path(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

fn deny(
    paths: &GuardPaths,
    kind: RouteKind,
    req: &ServiceRequest,
    invalid_token: bool,
    secure: bool,
) -> HttpResponse {
    let mut builder = match kind {
        RouteKind::ProtectedApi => HttpResponse::Unauthorized(),
        _ => HttpResponse::Found(),
    };

    if invalid_token {
        builder.cookie(cleared_session_cookie(secure));
    }

    match kind {
        RouteKind::ProtectedApi => builder.json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: "Admin session required".to_string(),
        }),
        _ => builder
            .append_header((
                header::LOCATION,
                paths.login_redirect(req.path(), req.query_string()),
            ))
            .finish(),
    }
}
