//! Binding a student id typed by a parent to the parent's chat.

use attend_core::{registration::parse_hemis_id, store::AttendanceStore};
use tracing::info;

/// The fixed answers a parent can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
  Prompt,
  InvalidFormat,
  NotFound,
  AlreadyRegistered,
  Registered,
  /// The store could not be reached; nothing was written.
  Unavailable,
}

impl Reply {
  pub fn text(self) -> &'static str {
    match self {
      Self::Prompt => "Please enter the student ID:",
      Self::InvalidFormat => "Please enter a valid student ID (a whole number).",
      Self::NotFound => "Unknown student ID. Please try again.",
      Self::AlreadyRegistered => {
        "This student ID is already registered. If this is a mistake, please \
         contact the administrator."
      }
      Self::Registered => {
        "Student ID registered. You will receive attendance notifications."
      }
      Self::Unavailable => "The service is temporarily unavailable. Please try again later.",
    }
  }
}

fn is_start_command(text: &str) -> bool {
  text
    .split_whitespace()
    .next()
    .is_some_and(|cmd| cmd == "/start" || cmd.starts_with("/start@"))
}

/// Handle one text message from `chat_id`.
///
/// Only an unregistered, known student id leads to a store write; an
/// existing registration is never replaced.
pub async fn handle_text<S: AttendanceStore>(
  store: &S,
  chat_id: i64,
  text: &str,
) -> Result<Reply, S::Error> {
  if is_start_command(text) {
    return Ok(Reply::Prompt);
  }

  let Ok(hemis_id) = parse_hemis_id(text) else {
    return Ok(Reply::InvalidFormat);
  };

  if store.get_subject(hemis_id).await?.is_none() {
    return Ok(Reply::NotFound);
  }

  let outcome = store.register(hemis_id, chat_id).await?;
  if outcome.is_new() {
    info!(hemis_id, chat_id, "recipient registered");
    return Ok(Reply::Registered);
  }
  info!(
    hemis_id,
    chat_id,
    registered_chat = outcome.registration().chat_id,
    "duplicate registration rejected"
  );
  Ok(Reply::AlreadyRegistered)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn start_command_variants() {
    assert!(is_start_command("/start"));
    assert!(is_start_command("  /start payload"));
    assert!(is_start_command("/start@attendance_bot"));
    assert!(!is_start_command("/stats"));
    assert!(!is_start_command("555"));
  }
}
