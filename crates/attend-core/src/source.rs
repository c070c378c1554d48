//! The `AttendanceApi` trait: the remote system attendance data is read from.
//!
//! Implemented over HTTP by `attend-remote`. Each paginated method returns a
//! single page; walk a whole listing with [`crate::pagination::Pages`].

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  FetchError,
  listing::{AbsenceGroup, Faculty},
  pagination::Page,
  subject::Subject,
};

pub trait AttendanceApi: Send + Sync {
  /// One page of the full student roster.
  fn students(
    &self,
    page: u32,
  ) -> impl Future<Output = Result<Page<Subject>, FetchError>> + Send + '_;

  /// One page of the absence report for `faculty_id` on `day`.
  fn absences(
    &self,
    faculty_id: i64,
    day: NaiveDate,
    page: u32,
  ) -> impl Future<Output = Result<Page<AbsenceGroup>, FetchError>> + Send + '_;

  /// The complete, single-page faculty listing.
  fn faculties(
    &self,
  ) -> impl Future<Output = Result<Vec<Faculty>, FetchError>> + Send + '_;
}
