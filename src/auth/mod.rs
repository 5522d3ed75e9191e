//! Admin authentication: credentials, one-time codes and session tokens.

pub mod code_store;
mod cookie;
pub mod credentials;
mod extractor;
pub mod session;

pub use code_store::{CODE_TTL, CodeCheck, VerificationCodeEntry, VerificationCodeStore};
pub use cookie::{cleared_session_cookie, session_cookie};
pub use credentials::{AdminCredential, CredentialVerifier};
pub use extractor::{AdminSession, bearer_token, session_token};
pub use session::{
    PENDING_TOKEN_TTL, SESSION_ISSUER, SESSION_TOKEN_TTL, SessionClaims, SessionTokens, Stage,
};
