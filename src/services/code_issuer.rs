//! Issues one-time codes: generate, store, dispatch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::messaging::CodeChannel;
use crate::auth::VerificationCodeStore;
use crate::error::AppResult;

/// Smallest issued code; every code has exactly six digits.
pub const CODE_MIN: u32 = 100_000;
/// Largest issued code.
pub const CODE_MAX: u32 = 999_999;

/// Uniformly random six-digit code in `CODE_MIN..=CODE_MAX`.
pub fn generate_code() -> String {
    rand::random_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Generates codes, records them in the store and sends them out.
#[derive(Clone)]
pub struct CodeIssuer {
    store: Arc<VerificationCodeStore>,
    channel: Arc<dyn CodeChannel>,
}

impl CodeIssuer {
    pub fn new(store: Arc<VerificationCodeStore>, channel: Arc<dyn CodeChannel>) -> Self {
        Self { store, channel }
    }

    pub async fn issue(&self, login: &str) -> AppResult<()> {
        self.issue_at(login, Utc::now()).await
    }

    /// Issue a fresh code for `login`, replacing any pending one.
    ///
    /// If delivery fails the entry written here is removed again, unless a
    /// newer code for the same login has replaced it meanwhile.
    pub async fn issue_at(&self, login: &str, now: DateTime<Utc>) -> AppResult<()> {
        let code = generate_code();

        let swept = self.store.cleanup_at(now);
        if swept > 0 {
            info!("Swept {} expired verification code(s)", swept);
        }
        self.store.set(login, &code, now);

        if let Err(e) = self.channel.deliver(login, &code).await {
            warn!("Code delivery failed for '{}', discarding issued code", login);
            self.store.delete_if_code(login, &code);
            return Err(e);
        }

        info!("Verification code issued for '{}'", login);
        Ok(())
    }
}
