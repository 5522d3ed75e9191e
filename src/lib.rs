//! Back-office admin gate library.
//!
//! Two-stage admin sign-in (password, then a one-time code delivered over
//! Telegram), JWT session handling and the route guard protecting the
//! admin area.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
