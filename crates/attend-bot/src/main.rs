//! attend-bot binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, syncs the student roster, then answers registrations over Telegram
//! and sends absence notifications once a day.
//!
//! ```text
//! attend-bot --config /etc/attend/config.toml run
//! attend-bot sync
//! attend-bot notify --day 2024-01-10
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use attend_bot::{BotConfig, Context, cycle, schedule, sync, updates};
use attend_remote::RemoteClient;
use attend_store_sqlite::SqliteStore;
use attend_telegram::TelegramBot;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

type AppContext = Context<SqliteStore, RemoteClient, TelegramBot>;

#[derive(Parser)]
#[command(author, version, about = "Daily attendance notifications over Telegram")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Sync the roster, then serve registrations and the daily schedule
  /// (default).
  Run,
  /// Sync the student roster once and exit.
  Sync,
  /// Run one notification cycle and exit.
  Notify {
    /// Day to report on, `YYYY-MM-DD`; defaults to today.
    #[arg(long)]
    day: Option<NaiveDate>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = BotConfig::load(&cli.config).context("failed to load configuration")?;
  let notify_at = cfg.notify_time()?;

  let store_path = cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let api = RemoteClient::new(cfg.remote()).context("failed to build API client")?;
  let bot = TelegramBot::new(cfg.telegram()).context("failed to build Telegram client")?;

  let ctx = Context::new(store, api, bot);

  match cli.command.unwrap_or(Command::Run) {
    Command::Run => serve(ctx, notify_at, cfg.poll_timeout_secs).await,
    Command::Sync => {
      sync::sync_subjects(&*ctx.api, &*ctx.store)
        .await
        .context("roster sync failed")?;
      Ok(())
    }
    Command::Notify { day } => {
      let day = day.unwrap_or_else(|| Local::now().date_naive());
      cycle::run_cycle(&ctx, day).await;
      Ok(())
    }
  }
}

async fn serve(ctx: AppContext, notify_at: NaiveTime, poll_timeout_secs: u64) -> anyhow::Result<()> {
  let me = ctx
    .notifier
    .get_me()
    .await
    .context("failed to reach the Telegram Bot API")?;
  tracing::info!(
    "Telegram bot: @{} ({})",
    me.username.as_deref().unwrap_or("unknown"),
    me.first_name
  );

  if let Err(e) = sync::sync_subjects(&*ctx.api, &*ctx.store).await {
    tracing::warn!(error = %e, "startup sync incomplete; serving the existing roster");
  }

  let cycle_ctx = ctx.clone();
  let daily = schedule::run_daily(notify_at, schedule::CycleGuard::new(), move || {
    let ctx = cycle_ctx.clone();
    async move {
      cycle::run_cycle(&ctx, Local::now().date_naive()).await;
    }
  });
  let polling = updates::run_update_loop(&*ctx.store, &*ctx.notifier, poll_timeout_secs);

  tokio::select! {
    () = daily => tracing::warn!("daily schedule stopped"),
    () = polling => tracing::warn!("telegram polling stopped"),
    res = tokio::signal::ctrl_c() => {
      res.context("failed to listen for ctrl-c")?;
      tracing::info!("shutting down");
    }
  }

  Ok(())
}
