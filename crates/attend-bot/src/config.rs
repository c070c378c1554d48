//! Runtime configuration, read from `config.toml` and `ATTEND_*` environment
//! variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use attend_remote::ApiConfig;
use attend_telegram::TelegramConfig;
use chrono::NaiveTime;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::{Error, Result};

/// Runtime bot configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
  pub bot_token:         String,
  /// Base URL of the remote attendance API, without the `/api` suffix.
  pub backend_url:       String,
  #[serde(default = "default_store_path")]
  pub store_path:        PathBuf,
  /// Daily trigger time, `HH:MM` in the process-local time zone.
  #[serde(default = "default_notify_at")]
  pub notify_at:         String,
  #[serde(default = "default_telegram_api_url")]
  pub telegram_api_url:  String,
  #[serde(default = "default_http_timeout_secs")]
  pub http_timeout_secs: u64,
  #[serde(default = "default_poll_timeout_secs")]
  pub poll_timeout_secs: u64,
}

fn default_store_path() -> PathBuf { PathBuf::from("attendance.sqlite") }
fn default_notify_at() -> String { "18:00".into() }
fn default_telegram_api_url() -> String { "https://api.telegram.org".into() }
fn default_http_timeout_secs() -> u64 { 30 }
fn default_poll_timeout_secs() -> u64 { 30 }

impl BotConfig {
  /// Layer `path` (optional) under `ATTEND_*` environment variables.
  pub fn load(path: &Path) -> Result<Self> {
    Self::from_builder(
      Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix("ATTEND")),
    )
  }

  /// Build from an explicit set of sources. Validates `notify_at`.
  pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
    let cfg: Self = builder.build()?.try_deserialize()?;
    cfg.notify_time()?;
    Ok(cfg)
  }

  pub fn notify_time(&self) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(self.notify_at.trim(), "%H:%M")
      .map_err(|_| Error::InvalidNotifyTime(self.notify_at.clone()))
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn store_path(&self) -> PathBuf {
    let s = self.store_path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/")
      && let Ok(home) = std::env::var("HOME")
    {
      return PathBuf::from(home).join(rest);
    }
    self.store_path.clone()
  }

  pub fn remote(&self) -> ApiConfig {
    ApiConfig {
      base_url: self.backend_url.clone(),
      timeout:  Duration::from_secs(self.http_timeout_secs),
    }
  }

  /// Long polls hold the request open for `poll_timeout_secs`, so the
  /// client timeout covers both.
  pub fn telegram(&self) -> TelegramConfig {
    TelegramConfig {
      token:   self.bot_token.clone(),
      api_url: self.telegram_api_url.clone(),
      timeout: Duration::from_secs(self.http_timeout_secs + self.poll_timeout_secs),
    }
  }
}
