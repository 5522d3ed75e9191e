//! HTTP middleware.

mod request_logger;
pub mod route_guard;

pub use request_logger::RequestLogger;
pub use route_guard::{GuardPaths, RouteGuard, RouteKind};
