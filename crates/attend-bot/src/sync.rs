//! Roster sync: copy every remote student into the local store.

use attend_core::{pagination::Pages, source::AttendanceApi, store::AttendanceStore};
use tracing::{error, info};

use crate::SyncError;

/// Totals for one completed sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
  pub pages:    u32,
  pub subjects: u64,
}

/// Walk the whole student listing and upsert each student by HEMIS id.
///
/// Stops at the first fetch or store failure. Subjects written before that
/// point are kept; there is no checkpoint, so the next run starts again at
/// page 1.
pub async fn sync_subjects<A, S>(api: &A, store: &S) -> Result<SyncReport, SyncError>
where
  A: AttendanceApi,
  S: AttendanceStore,
{
  let mut pages = Pages::new(move |n| api.students(n));
  let mut report = SyncReport::default();

  while let Some(next) = pages.next_page().await {
    let page = match next {
      Ok(page) => page,
      Err(e) => {
        error!(
          page = e.page(),
          synced = report.subjects,
          error = %e,
          "student sync aborted"
        );
        return Err(e.into());
      }
    };

    let (current, last) = (page.pagination.current_page, page.pagination.last_page);
    for subject in page.items {
      let hemis_id = subject.hemis_id;
      if let Err(e) = store.upsert_subject(subject).await {
        error!(hemis_id, page = current, error = %e, "student sync aborted");
        return Err(SyncError::Store(Box::new(e)));
      }
      report.subjects += 1;
    }
    report.pages += 1;
    info!("processed page {current} of {last}");
  }

  info!(
    pages = report.pages,
    subjects = report.subjects,
    "finished loading student roster"
  );
  Ok(report)
}
