//! Turning absence reports into notifications.

use attend_core::{
  listing::AbsenceGroup,
  notify::{Notifier, TextFormat},
  store::AttendanceStore,
};
use chrono::NaiveDate;
use tracing::{debug, error, warn};

/// Counters for one or more dispatched batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
  /// Notifications handed to the channel successfully.
  pub sent:    u32,
  /// Absent students nobody registered for.
  pub skipped: u32,
  /// Lookups or sends that failed.
  pub failed:  u32,
}

fn escape_html(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      c => out.push(c),
    }
  }
  out
}

fn bold(text: &str) -> String { format!("<b>{}</b>", escape_html(text)) }

/// The HTML body sent to a parent when `name` was absent on `day`.
pub fn compose_message(name: &str, day: NaiveDate) -> String {
  format!(
    "Attendance notice:\n\
     Your child ({}) did not come to the university today.\n\
     Date: {}",
    bold(name),
    bold(&day.format("%Y-%m-%d").to_string()),
  )
}

/// Notify the registered recipient of every absent student in `groups`.
///
/// Each student is handled on its own: an unregistered student is skipped,
/// and a failed lookup or send is logged and counted without affecting the
/// rest of the batch.
pub async fn dispatch_groups<S, N>(
  store: &S,
  notifier: &N,
  day: NaiveDate,
  groups: &[AbsenceGroup],
  report: &mut DispatchReport,
) where
  S: AttendanceStore,
  N: Notifier,
{
  for group in groups {
    for student in &group.absent_students {
      let registration = match store.get_registration(student.hemis_id).await {
        Ok(Some(registration)) => registration,
        Ok(None) => {
          report.skipped += 1;
          continue;
        }
        Err(e) => {
          warn!(hemis_id = student.hemis_id, error = %e, "registration lookup failed");
          report.failed += 1;
          continue;
        }
      };

      let text = compose_message(&student.name, day);
      match notifier.send(registration.chat_id, &text, TextFormat::Html).await {
        Ok(()) => {
          debug!(
            hemis_id = student.hemis_id,
            chat_id = registration.chat_id,
            group = %group.group_name,
            "absence notification sent"
          );
          report.sent += 1;
        }
        Err(e) => {
          error!(
            hemis_id = student.hemis_id,
            chat_id = registration.chat_id,
            error = %e,
            "absence notification failed"
          );
          report.failed += 1;
        }
      }
    }
  }
}
