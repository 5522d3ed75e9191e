//! Two-stage admin sign-in.
//!
//! ```text
//! Unauthenticated --password ok--> PendingVerification (token, 10 min)
//! PendingVerification --code ok--> Authenticated (cookie, 1 day)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::code_issuer::CodeIssuer;
use super::messaging::CodeChannel;
use crate::auth::{
    CodeCheck, CredentialVerifier, SessionClaims, SessionTokens, Stage, VerificationCodeStore,
};
use crate::error::AppResult;

/// Why a submitted code was not accepted. The user can correct all of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRejection {
    NotFound,
    Expired,
    Incorrect,
}

impl CodeRejection {
    pub fn message(self) -> &'static str {
        match self {
            CodeRejection::NotFound => "code not found or expired",
            CodeRejection::Expired => "code expired",
            CodeRejection::Incorrect => "incorrect code",
        }
    }
}

/// Result of the code verification step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code accepted; carries the full session token.
    Verified { session_token: String },
    Rejected(CodeRejection),
}

/// Orchestrates the sign-in stages over the auth components.
#[derive(Clone)]
pub struct AdminAuth {
    credentials: CredentialVerifier,
    tokens: SessionTokens,
    codes: Arc<VerificationCodeStore>,
    issuer: CodeIssuer,
}

impl AdminAuth {
    pub fn new(
        credentials: CredentialVerifier,
        tokens: SessionTokens,
        codes: Arc<VerificationCodeStore>,
        channel: Arc<dyn CodeChannel>,
    ) -> Self {
        let issuer = CodeIssuer::new(codes.clone(), channel);
        Self {
            credentials,
            tokens,
            codes,
            issuer,
        }
    }

    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }

    /// The pending-code store. Exposed for inspection in tests and tooling.
    pub fn codes(&self) -> &VerificationCodeStore {
        &self.codes
    }

    /// Stage 1: check credentials and mint the intermediate token.
    pub fn login(&self, login: &str, password: &str) -> AppResult<String> {
        self.credentials.verify(login, password)?;
        let token = self.tokens.mint(login, Stage::PendingVerification)?;
        info!("Password accepted for '{}', awaiting verification code", login);
        Ok(token)
    }

    /// Verify an intermediate token: valid signature and pending stage.
    pub fn pending_claims(&self, token: &str) -> AppResult<SessionClaims> {
        let claims = self.tokens.verify(token)?;
        claims.require_stage(Stage::PendingVerification)?;
        Ok(claims)
    }

    /// Stage 2a: issue and send a code for the holder of `token`.
    pub async fn request_code(&self, token: &str) -> AppResult<()> {
        let claims = self.pending_claims(token)?;
        self.issuer.issue(claims.login()).await
    }

    pub fn verify_code(&self, token: &str, code: &str) -> AppResult<VerifyOutcome> {
        self.verify_code_at(token, code, Utc::now())
    }

    /// Stage 2b: check the submitted code and mint the full session token.
    ///
    /// Token problems are errors. Code problems are a `Rejected` outcome.
    pub fn verify_code_at(
        &self,
        token: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<VerifyOutcome> {
        let claims = self.pending_claims(token)?;
        let login = claims.login();

        let rejection = match self.codes.consume_at(login, code, now) {
            CodeCheck::Accepted => None,
            CodeCheck::NotFound => Some(CodeRejection::NotFound),
            CodeCheck::Expired => Some(CodeRejection::Expired),
            CodeCheck::Mismatch => Some(CodeRejection::Incorrect),
        };

        if let Some(rejection) = rejection {
            info!("Verification code rejected for '{}': {}", login, rejection.message());
            return Ok(VerifyOutcome::Rejected(rejection));
        }

        let session_token = self.tokens.mint_at(login, Stage::Authenticated, now)?;
        info!("Admin '{}' signed in", login);
        Ok(VerifyOutcome::Verified { session_token })
    }
}
