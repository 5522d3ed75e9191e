//! The `admin_token` session cookie.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};

use super::session::SESSION_TOKEN_TTL;
use crate::config::SESSION_COOKIE;

/// HttpOnly, SameSite=Strict cookie carrying the full session token.
/// `secure` is set in production.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_secure(secure);
    cookie.set_max_age(Duration::seconds(SESSION_TOKEN_TTL.num_seconds()));
    cookie
}

/// Cookie that makes the browser drop the session cookie.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.set_max_age(Duration::ZERO);
    cookie
}
