//! Error type for `attend-telegram`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("telegram request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The Bot API answered with `ok: false`.
  #[error("telegram API error in {method}: {description}")]
  Api {
    method:      &'static str,
    code:        Option<i64>,
    description: String,
  },

  #[error("telegram API returned no result for {0}")]
  MissingResult(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
