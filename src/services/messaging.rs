//! Out-of-band delivery of one-time codes.
//!
//! The production channel is a Telegram bot posting to a configured chat.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::TelegramSettings;
use crate::error::{AppError, AppResult};

/// HTTP connect timeout for Bot API calls.
const HTTP_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
/// HTTP total timeout for Bot API calls.
const HTTP_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Human-readable message carrying a login code.
pub fn format_code_message(login: &str, code: &str) -> String {
    format!(
        "Admin panel sign-in for \"{}\"\n\nVerification code: {}\n\nThe code is valid for 5 minutes. If you did not try to sign in, change the admin password.",
        login, code
    )
}

/// Channel delivering a code to the admin.
#[async_trait]
pub trait CodeChannel: Send + Sync {
    async fn deliver(&self, login: &str, code: &str) -> AppResult<()>;
}

/// Telegram Bot API channel (`sendMessage`).
pub struct TelegramChannel {
    client: reqwest::Client,
    api_url: String,
    bot_token: Option<SecretString>,
    chat_id: Option<String>,
}

impl TelegramChannel {
    pub fn new(settings: &TelegramSettings) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            bot_token: settings.bot_token.clone(),
            chat_id: settings.chat_id.clone(),
        })
    }
}

#[derive(Deserialize)]
struct BotApiResponse {
    ok: bool,
    description: Option<String>,
}

#[async_trait]
impl CodeChannel for TelegramChannel {
    async fn deliver(&self, login: &str, code: &str) -> AppResult<()> {
        let (Some(bot_token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            return Err(AppError::Delivery(
                "Telegram bot token or chat id is not configured".to_string(),
            ));
        };

        let url = format!("{}/bot{}/sendMessage", self.api_url, bot_token.expose_secret());

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": format_code_message(login, code),
            }))
            .send()
            .await
            .map_err(|e| {
                warn!("Telegram: request failed: {}", e.without_url());
                AppError::Delivery("Telegram API is unreachable".to_string())
            })?;

        let status = response.status();
        let body: Option<BotApiResponse> = response.json().await.ok();

        match body {
            Some(body) if status.is_success() && body.ok => {
                info!("Verification code delivered via Telegram");
                Ok(())
            }
            Some(body) => Err(AppError::Delivery(format!(
                "Telegram API rejected message ({}): {}",
                status,
                body.description.unwrap_or_default()
            ))),
            None => Err(AppError::Delivery(format!(
                "Telegram API returned an unreadable response ({})",
                status
            ))),
        }
    }
}
