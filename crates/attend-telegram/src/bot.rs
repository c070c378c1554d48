//! [`TelegramBot`], a thin async client for the Telegram Bot API.

use std::time::Duration;

use attend_core::notify::{Notifier, TextFormat};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
  Error, Result,
  types::{ApiResponse, Message, Update, User},
};

/// Connection settings for the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
  pub token:   String,
  /// Normally `https://api.telegram.org`.
  pub api_url: String,
  /// Per-request timeout; must exceed the long-poll timeout.
  pub timeout: Duration,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TelegramBot {
  client: reqwest::Client,
  config: TelegramConfig,
}

impl TelegramBot {
  pub fn new(config: TelegramConfig) -> Result<Self> {
    let client = reqwest::Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, method: &str) -> String {
    format!(
      "{}/bot{}/{}",
      self.config.api_url.trim_end_matches('/'),
      self.config.token,
      method
    )
  }

  async fn call<T: DeserializeOwned>(
    &self,
    method: &'static str,
    body: serde_json::Value,
  ) -> Result<T> {
    let resp: ApiResponse<T> = self
      .client
      .post(self.url(method))
      .json(&body)
      .send()
      .await?
      .json()
      .await?;

    if !resp.ok {
      return Err(Error::Api {
        method,
        code: resp.error_code,
        description: resp.description.unwrap_or_default(),
      });
    }
    resp.result.ok_or(Error::MissingResult(method))
  }

  /// `getMe`: the bot's own account.
  pub async fn get_me(&self) -> Result<User> { self.call("getMe", json!({})).await }

  /// `getUpdates`: long-poll for updates with id `>= offset`.
  pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
    self
      .call(
        "getUpdates",
        json!({
          "offset": offset,
          "timeout": timeout_secs,
          "allowed_updates": ["message"],
        }),
      )
      .await
  }

  /// `sendMessage`: deliver `text` to `chat_id`.
  pub async fn send_message(
    &self,
    chat_id: i64,
    text: &str,
    format: TextFormat,
  ) -> Result<Message> {
    let mut body = json!({ "chat_id": chat_id, "text": text });
    if format == TextFormat::Html {
      body["parse_mode"] = json!("HTML");
    }
    self.call("sendMessage", body).await
  }
}

impl Notifier for TelegramBot {
  type Error = Error;

  async fn send(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<()> {
    self.send_message(chat_id, text, format).await?;
    Ok(())
  }
}
