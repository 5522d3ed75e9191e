//! Stage-1 check of the admin login and password.

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::config::AdminCredentialSettings;
use crate::error::{AppError, AppResult};

/// Stored admin credential. The password is only kept as a bcrypt hash.
#[derive(Clone)]
pub struct AdminCredential {
    login: String,
    password_hash: SecretString,
}

impl AdminCredential {
    pub fn new(login: impl Into<String>, password_hash: SecretString) -> Self {
        Self {
            login: login.into(),
            password_hash,
        }
    }
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredential")
            .field("login", &self.login)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Verifies submitted credentials against the configured admin.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    credential: Option<AdminCredential>,
}

impl CredentialVerifier {
    pub fn new(credential: Option<AdminCredential>) -> Self {
        Self { credential }
    }

    /// Build from configuration. Missing login or hash leaves the verifier
    /// unconfigured; every check then fails with `Configuration`.
    pub fn from_settings(settings: &AdminCredentialSettings) -> Self {
        let credential = match (&settings.login, &settings.password_hash) {
            (Some(login), Some(hash)) => Some(AdminCredential::new(login.clone(), hash.clone())),
            _ => None,
        };
        Self::new(credential)
    }

    /// Check `login` and `password`.
    ///
    /// A wrong login and a wrong password both yield `InvalidCredentials`.
    /// The password hash is checked even when the login is wrong.
    pub fn verify(&self, login: &str, password: &str) -> AppResult<()> {
        let credential = self.credential.as_ref().ok_or_else(|| {
            AppError::Configuration("admin login or password hash is not configured".to_string())
        })?;

        let login_ok: bool = credential
            .login
            .as_bytes()
            .ct_eq(login.as_bytes())
            .into();

        let password_ok = bcrypt::verify(password, credential.password_hash.expose_secret())
            .map_err(|e| AppError::Configuration(format!("stored admin password hash is unusable: {}", e)))?;

        if login_ok && password_ok {
            Ok(())
        } else {
            warn!("Admin login rejected");
            Err(AppError::InvalidCredentials)
        }
    }
}
