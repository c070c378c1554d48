//! The subset of Bot API objects this bot reads.

use serde::Deserialize;

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
  pub ok:          bool,
  pub result:      Option<T>,
  pub description: Option<String>,
  pub error_code:  Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id: i64,
  pub message:   Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub message_id: i64,
  pub from:       Option<User>,
  pub chat:       Chat,
  pub text:       Option<String>,
  pub date:       i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
  pub id:         i64,
  pub is_bot:     bool,
  pub first_name: String,
  pub username:   Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
  pub id: i64,
  #[serde(rename = "type")]
  pub chat_type: String,
}

impl Update {
  /// `(chat_id, text)` for a text message from a human, if this update
  /// carries one.
  pub fn text_message(&self) -> Option<(i64, &str)> {
    let msg = self.message.as_ref()?;
    if msg.from.as_ref().is_some_and(|u| u.is_bot) {
      return None;
    }
    Some((msg.chat.id, msg.text.as_deref()?))
  }
}
