//! Reading the day's absence reports.

use attend_core::{
  listing::{AbsenceGroup, Faculty},
  pagination::Pages,
  source::AttendanceApi,
};
use chrono::NaiveDate;
use tracing::error;

/// Every absence group reported for `faculty_id` on `day`, in listing order.
///
/// If a page fails, the groups gathered from earlier pages are still
/// returned.
pub async fn absent_groups<A: AttendanceApi>(
  api: &A,
  faculty_id: i64,
  day: NaiveDate,
) -> Vec<AbsenceGroup> {
  let mut pages = Pages::new(move |n| api.absences(faculty_id, day, n));
  let mut groups = Vec::new();

  while let Some(next) = pages.next_page().await {
    match next {
      Ok(page) => groups.extend(page.items),
      Err(e) => error!(
        faculty_id,
        %day,
        page = e.page(),
        kept = groups.len(),
        error = %e,
        "absence query aborted; keeping partial result"
      ),
    }
  }
  groups
}

/// The faculty list for this cycle; empty if it cannot be fetched.
pub async fn faculties<A: AttendanceApi>(api: &A) -> Vec<Faculty> {
  match api.faculties().await {
    Ok(faculties) => faculties,
    Err(e) => {
      error!(error = %e, "could not list faculties; skipping this cycle");
      Vec::new()
    }
  }
}
