//! Error type for `attend-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The insert-if-absent reported a conflict but the existing row could
  /// not be read back.
  #[error("registration for student {0} vanished during insert")]
  RegistrationVanished(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
