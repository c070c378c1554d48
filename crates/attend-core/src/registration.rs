//! Recipient registrations: the opt-in binding of a subject to a chat.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Parse a HEMIS identifier typed in by a user.
///
/// Surrounding whitespace is ignored; anything else that is not an integer
/// is rejected.
pub fn parse_hemis_id(input: &str) -> Result<i64> {
  input
    .trim()
    .parse()
    .map_err(|_| Error::InvalidHemisId(input.to_owned()))
}

/// Binds one subject to one delivery address. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
  pub hemis_id:      i64,
  /// Opaque, channel-specific delivery address (a Telegram chat id).
  pub chat_id:       i64,
  /// Set by the store on insert.
  pub registered_at: DateTime<Utc>,
}

/// Result of an insert-if-absent registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
  /// A new registration was written.
  Registered(Registration),
  /// A registration for this subject already existed; it is returned
  /// unchanged.
  AlreadyRegistered(Registration),
}

impl RegisterOutcome {
  pub fn registration(&self) -> &Registration {
    match self {
      Self::Registered(r) | Self::AlreadyRegistered(r) => r,
    }
  }

  pub fn is_new(&self) -> bool { matches!(self, Self::Registered(_)) }
}
