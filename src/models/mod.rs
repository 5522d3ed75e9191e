//! Domain models for the admin gate API.

pub mod auth;

pub use auth::{
    AuthStepResponse, LoginRequest, LoginResponse, SessionInfoResponse, SessionUser,
    TokenCheckResponse, VerifyCodeRequest,
};
