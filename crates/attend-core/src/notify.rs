//! The outbound delivery channel.

use std::future::Future;

/// How the receiving client should render a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
  #[default]
  Plain,
  /// Minimal HTML emphasis markup (`<b>`, `<i>`); other text must be escaped.
  Html,
}

/// Best-effort delivery of a text message to a channel address.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Send `text` to `chat_id`. A failure concerns this message only.
  fn send<'a>(
    &'a self,
    chat_id: i64,
    text: &'a str,
    format: TextFormat,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
