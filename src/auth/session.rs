//! Signed session tokens (HS256 JWT) carrying the authentication stage.
//!
//! Tokens are not stored server-side. Validity is signature + expiry; the
//! stage claim is checked by callers.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Session JWT issuer.
pub const SESSION_ISSUER: &str = "backoffice-gate";

/// Lifetime of the intermediate token issued after the password check.
pub const PENDING_TOKEN_TTL: Duration = Duration::minutes(10);

/// Lifetime of the full session token.
pub const SESSION_TOKEN_TTL: Duration = Duration::days(1);

/// Authentication stage carried by a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Password accepted, one-time code still outstanding.
    PendingVerification,
    /// Both factors accepted.
    Authenticated,
}

impl Stage {
    pub fn ttl(self) -> Duration {
        match self {
            Stage::PendingVerification => PENDING_TOKEN_TTL,
            Stage::Authenticated => SESSION_TOKEN_TTL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PendingVerification => "pending_verification",
            Stage::Authenticated => "authenticated",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub stage: Stage,
}

impl SessionClaims {
    pub fn login(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn is_authenticated(&self) -> bool {
        self.stage == Stage::Authenticated
    }

    /// Fail with `InvalidStage` unless the token carries `expected`.
    pub fn require_stage(&self, expected: Stage) -> AppResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(AppError::InvalidStage(format!(
                "expected {}, got {}",
                expected, self.stage
            )))
        }
    }
}

/// Mints and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct SessionTokens {
    secret: SecretString,
}

impl SessionTokens {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Mint a token for `login` at `stage`, expiring after the stage's TTL.
    pub fn mint(&self, login: &str, stage: Stage) -> AppResult<String> {
        self.mint_at(login, stage, Utc::now())
    }

    pub fn mint_at(&self, login: &str, stage: Stage, now: DateTime<Utc>) -> AppResult<String> {
        let claims = SessionClaims {
            sub: login.to_string(),
            iss: SESSION_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + stage.ttl()).timestamp(),
            stage,
        };

        let key = EncodingKey::from_secret(self.secret.expose_secret().as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| AppError::Configuration(format!("Failed to sign session token: {}", e)))
    }

    /// Check signature, issuer and expiry. Any failure is `InvalidToken`.
    ///
    /// The stage is not checked here.
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_aud = false;
        validation.leeway = 0;

        decode::<SessionClaims>(token.trim(), &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Session token rejected: {}", e);
                AppError::InvalidToken
            })
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionTokens([REDACTED])")
    }
}
