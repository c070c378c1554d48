//! One end-to-end notification cycle.

use attend_core::{notify::Notifier, source::AttendanceApi, store::AttendanceStore};
use chrono::NaiveDate;
use tracing::info;

use crate::{
  Context, absence,
  dispatch::{DispatchReport, dispatch_groups},
};

/// Fetch every faculty's absences for `day` and notify registered
/// recipients. Failures are logged and counted; this never errors.
pub async fn run_cycle<S, A, N>(ctx: &Context<S, A, N>, day: NaiveDate) -> DispatchReport
where
  S: AttendanceStore,
  A: AttendanceApi,
  N: Notifier,
{
  let faculties = absence::faculties(&*ctx.api).await;
  let mut report = DispatchReport::default();

  for faculty in &faculties {
    let groups = absence::absent_groups(&*ctx.api, faculty.id, day).await;
    dispatch_groups(&*ctx.store, &*ctx.notifier, day, &groups, &mut report).await;
    info!(
      faculty = %faculty.name,
      groups = groups.len(),
      "processed notifications for faculty"
    );
  }

  info!(
    %day,
    faculties = faculties.len(),
    sent = report.sent,
    skipped = report.skipped,
    failed = report.failed,
    "finished sending attendance notifications"
  );
  report
}
