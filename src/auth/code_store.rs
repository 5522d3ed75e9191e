//! In-memory store of pending one-time verification codes.
//!
//! One live entry per login. An entry older than [`CODE_TTL`] is expired and
//! never matches, whether or not a sweep has removed it yet.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;

/// How long an issued code stays valid.
pub const CODE_TTL: Duration = Duration::minutes(5);

/// A pending code for one login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCodeEntry {
    pub login: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

impl VerificationCodeEntry {
    /// Expired once strictly more than [`CODE_TTL`] has passed since issuance.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > CODE_TTL
    }
}

/// Result of checking a submitted code against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// Code matched; the entry has been removed.
    Accepted,
    /// No entry for this login.
    NotFound,
    /// Entry was past its lifetime; it has been removed.
    Expired,
    /// Entry exists but the code differs; the entry is kept for retries.
    Mismatch,
}

/// Process-wide map from login to its pending code.
///
/// Every operation takes the single lock, so operations are atomic with
/// respect to each other.
#[derive(Debug, Default)]
pub struct VerificationCodeStore {
    entries: Mutex<HashMap<String, VerificationCodeEntry>>,
}

impl VerificationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-written,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, VerificationCodeEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a code for `login`, replacing any previous entry.
    pub fn set(&self, login: &str, code: &str, issued_at: DateTime<Utc>) {
        self.lock().insert(
            login.to_string(),
            VerificationCodeEntry {
                login: login.to_string(),
                code: code.to_string(),
                issued_at,
            },
        );
    }

    pub fn get(&self, login: &str) -> Option<VerificationCodeEntry> {
        self.lock().get(login).cloned()
    }

    /// Remove the entry for `login`. Removing an absent entry is a no-op.
    pub fn delete(&self, login: &str) {
        self.lock().remove(login);
    }

    /// Remove the entry for `login` only if it still holds `code`.
    ///
    /// Returns whether an entry was removed. A newer code issued for the
    /// same login in the meantime is left untouched.
    pub fn delete_if_code(&self, login: &str, code: &str) -> bool {
        let mut entries = self.lock();
        match entries.get(login) {
            Some(entry) if entry.code == code => {
                entries.remove(login);
                true
            }
            _ => false,
        }
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Utc::now())
    }

    pub fn cleanup_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    /// Check `submitted` against the pending code for `login` and consume it
    /// on a match.
    ///
    /// Lookup, expiry check, comparison, removal and the sweep of other
    /// expired entries happen under one lock, so a code is accepted at most
    /// once even under concurrent calls.
    pub fn consume_at(&self, login: &str, submitted: &str, now: DateTime<Utc>) -> CodeCheck {
        let mut entries = self.lock();

        let check = match entries.get(login) {
            None => CodeCheck::NotFound,
            Some(entry) if entry.is_expired_at(now) => CodeCheck::Expired,
            Some(entry) => {
                let matches: bool = entry
                    .code
                    .as_bytes()
                    .ct_eq(submitted.trim().as_bytes())
                    .into();
                if matches {
                    CodeCheck::Accepted
                } else {
                    CodeCheck::Mismatch
                }
            }
        };

        if matches!(check, CodeCheck::Accepted | CodeCheck::Expired) {
            entries.remove(login);
        }
        entries.retain(|_, entry| !entry.is_expired_at(now));

        check
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
