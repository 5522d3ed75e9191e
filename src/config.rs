//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

/// Name of the cookie carrying the full admin session token.
pub const SESSION_COOKIE: &str = "admin_token";

/// Minimum signing secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Stored admin credential: login plus bcrypt hash of the password.
#[derive(Debug, Clone)]
pub struct AdminCredentialSettings {
    pub login: Option<String>,
    pub password_hash: Option<SecretString>,
}

/// Telegram bot used to deliver one-time codes.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    /// Bot API base URL (overridable for tests and self-hosted bot servers)
    pub api_url: String,
    pub bot_token: Option<SecretString>,
    pub chat_id: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory for the admin frontend build
    pub static_dir: Option<PathBuf>,
    /// Session token signing secret
    pub jwt_secret: SecretString,
    pub admin: AdminCredentialSettings,
    pub telegram: TelegramSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `JWT_SECRET` is required in every environment; there is no fallback
    /// signing secret.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `GATE_HOST`: Server host (default: 127.0.0.1)
    /// - `GATE_PORT`: Server port (default: 8080)
    /// - `GATE_STATIC_DIR`: Admin frontend build directory
    /// - `JWT_SECRET`: Session signing secret - REQUIRED
    /// - `ADMIN_LOGIN`: Admin login
    /// - `ADMIN_PASSWORD_HASH`: bcrypt hash of the admin password
    /// - `TELEGRAM_BOT_TOKEN`: Bot token for code delivery
    /// - `TELEGRAM_CHAT_ID`: Chat receiving the codes
    /// - `TELEGRAM_API_URL`: Bot API base URL (default: https://api.telegram.org)
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("GATE_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("GATE_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("GATE_PORT must be a valid port number"))?;

        let static_dir = env::var("GATE_STATIC_DIR").ok().map(PathBuf::from);

        let jwt_secret = non_empty_var("JWT_SECRET")
            .map(SecretString::from)
            .ok_or(ConfigError::MissingEnvVar("JWT_SECRET"))?;

        let admin = AdminCredentialSettings {
            login: non_empty_var("ADMIN_LOGIN"),
            password_hash: non_empty_var("ADMIN_PASSWORD_HASH").map(SecretString::from),
        };

        let telegram = TelegramSettings {
            api_url: env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| defaults::TELEGRAM_API_URL.to_string()),
            bot_token: non_empty_var("TELEGRAM_BOT_TOKEN").map(SecretString::from),
            chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
        };

        let config = Config {
            environment,
            host,
            port,
            static_dir,
            jwt_secret,
            admin,
            telegram,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate settings that must be real in production.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.jwt_secret.expose_secret().len() < MIN_PRODUCTION_SECRET_LEN {
            errors.push(format!(
                "JWT_SECRET must be at least {} bytes long in production.",
                MIN_PRODUCTION_SECRET_LEN
            ));
        }

        if self.admin.login.is_none() || self.admin.password_hash.is_none() {
            errors.push("ADMIN_LOGIN and ADMIN_PASSWORD_HASH must both be set.".to_string());
        }

        if self.telegram.bot_token.is_none() || self.telegram.chat_id.is_none() {
            errors.push(
                "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must both be set for code delivery."
                    .to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    /// Whether session cookies carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
