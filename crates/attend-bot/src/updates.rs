//! The inbound side of the Telegram channel: long-poll for messages and
//! answer registration attempts.

use std::time::Duration;

use attend_core::{
  notify::{Notifier, TextFormat},
  store::AttendanceStore,
};
use attend_telegram::TelegramBot;
use tracing::{error, info, warn};

use crate::register::{self, Reply};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Answer one text message. A store failure is answered with
/// [`Reply::Unavailable`].
pub async fn respond<S, N>(store: &S, notifier: &N, chat_id: i64, text: &str) -> Reply
where
  S: AttendanceStore,
  N: Notifier,
{
  let reply = register::handle_text(store, chat_id, text)
    .await
    .unwrap_or_else(|e| {
      error!(chat_id, error = %e, "registration failed");
      Reply::Unavailable
    });

  if let Err(e) = notifier.send(chat_id, reply.text(), TextFormat::Plain).await {
    warn!(chat_id, error = %e, "could not deliver reply");
  }
  reply
}

/// Poll `bot` for updates forever, answering each text message.
pub async fn run_update_loop<S: AttendanceStore>(
  store: &S,
  bot: &TelegramBot,
  poll_timeout_secs: u64,
) {
  info!("telegram polling loop started");
  let mut offset = 0;

  loop {
    let updates = match bot.get_updates(offset, poll_timeout_secs).await {
      Ok(updates) => updates,
      Err(e) => {
        error!(error = %e, "telegram polling failed");
        tokio::time::sleep(RETRY_DELAY).await;
        continue;
      }
    };

    for update in updates {
      offset = offset.max(update.update_id + 1);
      if let Some((chat_id, text)) = update.text_message() {
        respond(store, bot, chat_id, text).await;
      }
    }
  }
}
