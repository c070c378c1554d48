//! Error types for `attend-bot`.

use attend_core::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("invalid notify_at {0:?}: expected HH:MM")]
  InvalidNotifyTime(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a roster sync stopped early. Subjects upserted before the failure
/// stay in the store.
#[derive(Debug, Error)]
pub enum SyncError {
  #[error("roster fetch failed: {0}")]
  Fetch(#[from] FetchError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}
