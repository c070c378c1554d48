//! Daily wall-clock trigger for the notification cycle.

use std::{fmt, future::Future, sync::Arc};

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{error, info, warn};

/// Resolve a local wall-clock time in `tz`. A time skipped by a DST jump
/// resolves to the first valid instant an hour later.
fn resolve<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
  tz.from_local_datetime(&local)
    .earliest()
    .or_else(|| tz.from_local_datetime(&(local + TimeDelta::hours(1))).earliest())
}

/// The first instant strictly after `now` whose wall-clock time is `at`.
pub fn next_fire<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> Option<DateTime<Tz>> {
  let tz = now.timezone();
  let today = now.date_naive();
  let tomorrow = today.succ_opt();

  [Some(today), tomorrow, tomorrow.and_then(|d| d.succ_opt())]
    .into_iter()
    .flatten()
    .filter_map(|date| resolve(&tz, date.and_time(at)))
    .find(|candidate| candidate > now)
}

// ─── Single-flight guard ─────────────────────────────────────────────────────

/// Allows at most one notification cycle at a time.
#[derive(Clone)]
pub struct CycleGuard {
  permits: Arc<Semaphore>,
}

impl Default for CycleGuard {
  fn default() -> Self { Self::new() }
}

impl CycleGuard {
  pub fn new() -> Self { Self { permits: Arc::new(Semaphore::new(1)) } }

  /// Claim the guard; `None` while another cycle holds it. The guard is
  /// released when the permit is dropped.
  pub fn try_begin(&self) -> Option<OwnedSemaphorePermit> {
    self.permits.clone().try_acquire_owned().ok()
  }

  #[cfg(test)]
  fn is_running(&self) -> bool { self.permits.available_permits() == 0 }
}

// ─── Runner ──────────────────────────────────────────────────────────────────

/// Fire `job` every day at `at` local time, forever.
///
/// Each run is spawned on its own task. A trigger that arrives while the
/// previous run still holds `guard` is skipped.
pub async fn run_daily<F, Fut>(at: NaiveTime, guard: CycleGuard, job: F)
where
  F: FnMut() -> Fut,
  Fut: Future<Output = ()> + Send + 'static,
{
  run_daily_with(at, guard, Local::now, job).await
}

/// [`run_daily`] against an arbitrary wall clock.
async fn run_daily_with<Tz, C, F, Fut>(at: NaiveTime, guard: CycleGuard, clock: C, mut job: F)
where
  Tz: TimeZone,
  Tz::Offset: fmt::Display,
  C: Fn() -> DateTime<Tz>,
  F: FnMut() -> Fut,
  Fut: Future<Output = ()> + Send + 'static,
{
  // The wall clock may lag the timer; never schedule the same instant twice.
  let mut last_fired: Option<DateTime<Tz>> = None;

  loop {
    let now = clock();
    let from = match &last_fired {
      Some(last) if *last > now => last.clone(),
      _ => now.clone(),
    };
    let Some(next) = next_fire(&from, at) else {
      error!(%at, "no valid trigger time in the next two days; daily schedule stopped");
      return;
    };
    info!(next = %next, "next notification cycle scheduled");

    let wait = next.clone() - now;
    tokio::time::sleep(wait.to_std().unwrap_or_default()).await;
    last_fired = Some(next);

    let Some(permit) = guard.try_begin() else {
      warn!("previous notification cycle still running; skipping this trigger");
      continue;
    };

    let cycle = job();
    tokio::spawn(async move {
      let _permit = permit;
      if let Err(e) = tokio::spawn(cycle).await {
        error!(error = %e, "notification cycle panicked");
      }
    });
  }
}
