//! Access log for the gate.
//!
//! One line per request on the `access` target. Token values never reach
//! the log; only whether one was presented and, once the route guard has
//! admitted the request, the signed-in admin.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::auth::{SessionClaims, session_token};

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

/// Request logger middleware service.
pub struct RequestLoggerMiddleware<S> {
    service: S,
}

/// What is known about a request before it is handled.
struct AccessEntry {
    method: String,
    path: String,
    remote_addr: String,
    session: &'static str,
    started: Instant,
}

impl AccessEntry {
    fn from_request(req: &ServiceRequest) -> Self {
        Self {
            method: req.method().to_string(),
            path: req.path().to_string(),
            remote_addr: req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string(),
            session: if session_token(req.request()).is_some() {
                "present"
            } else {
                "none"
            },
            started: Instant::now(),
        }
    }

    fn finish(&self, status: StatusCode, admin: Option<&str>) {
        let status_code = status.as_u16();
        let duration_ms = self.started.elapsed().as_millis();
        let admin = admin.unwrap_or("-");
        let (method, path, remote_addr, session) =
            (&self.method, &self.path, &self.remote_addr, self.session);

        macro_rules! access {
            ($level:ident, $msg:literal) => {
                $level!(
                    target: "access",
                    method = %method,
                    path = %path,
                    remote_addr = %remote_addr,
                    session = %session,
                    admin = %admin,
                    status = %status_code,
                    duration_ms = %duration_ms,
                    $msg
                )
            };
        }

        if status.is_server_error() {
            access!(error, "Request failed");
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            access!(warn, "Request denied");
        } else if status.is_client_error() {
            access!(warn, "Client error");
        } else {
            access!(info, "Request completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let entry = AccessEntry::from_request(&req);
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            // Claims are only present when the route guard admitted the request
            let admin = res
                .request()
                .extensions()
                .get::<SessionClaims>()
                .map(|claims| claims.sub.clone());
            entry.finish(res.status(), admin.as_deref());
            Ok(res)
        })
    }
}
