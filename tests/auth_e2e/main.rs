//! Admin sign-in E2E test suite.
//!
//! Drives the full actix app (routes + route guard) in-process. Code
//! delivery is captured by a recording channel; the Telegram channel itself
//! is exercised against an in-process mock Bot API server.
//!
//! Run with: cargo test --test auth_e2e

mod mock_telegram;

mod test_login;
mod test_route_guard;
