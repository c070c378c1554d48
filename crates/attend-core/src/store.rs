//! The `AttendanceStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `attend-store-sqlite`).
//! Higher layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  registration::{RegisterOutcome, Registration},
  subject::Subject,
};

/// Durable storage for subjects and recipient registrations.
///
/// Subjects are upserted by HEMIS id and never deleted. Registrations are
/// insert-if-absent and never mutated; there is at most one per subject.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait AttendanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Subjects ──────────────────────────────────────────────────────────

  /// Insert the subject, or overwrite every field of the existing row with
  /// the same `hemis_id`.
  fn upsert_subject(
    &self,
    subject: Subject,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a subject by HEMIS id. Returns `None` if not found.
  fn get_subject(
    &self,
    hemis_id: i64,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// List all subjects ordered by HEMIS id.
  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  // ── Registrations ─────────────────────────────────────────────────────

  /// Atomically bind `hemis_id` to `chat_id` unless a registration for
  /// `hemis_id` already exists, in which case the existing one is returned
  /// untouched.
  fn register(
    &self,
    hemis_id: i64,
    chat_id: i64,
  ) -> impl Future<Output = Result<RegisterOutcome, Self::Error>> + Send + '_;

  /// The registration for `hemis_id`, if any.
  fn get_registration(
    &self,
    hemis_id: i64,
  ) -> impl Future<Output = Result<Option<Registration>, Self::Error>> + Send + '_;

  /// All registrations ordered by HEMIS id.
  fn list_registrations(
    &self,
  ) -> impl Future<Output = Result<Vec<Registration>, Self::Error>> + Send + '_;
}
