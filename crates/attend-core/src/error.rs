//! Error types for `attend-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid student id {0:?}")]
  InvalidHemisId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a single page of a remote listing could not be obtained.
///
/// Either variant aborts the remaining pages of that listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  /// The request failed or the remote answered with a non-success status.
  #[error("transport error on page {page}: {reason}")]
  Transport { page: u32, reason: String },

  /// The remote answered, but the body does not have the expected shape.
  #[error("validation error on page {page}: {reason}")]
  Validation { page: u32, reason: String },
}

impl FetchError {
  /// The page the failure happened on.
  pub fn page(&self) -> u32 {
    match self {
      Self::Transport { page, .. } | Self::Validation { page, .. } => *page,
    }
  }
}
