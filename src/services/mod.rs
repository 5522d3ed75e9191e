//! Business logic services.

pub mod admin_auth;
pub mod code_issuer;
pub mod messaging;

pub use admin_auth::{AdminAuth, CodeRejection, VerifyOutcome};
pub use code_issuer::{CodeIssuer, generate_code};
pub use messaging::{CodeChannel, TelegramChannel, format_code_message};
