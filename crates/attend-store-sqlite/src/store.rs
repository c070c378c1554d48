//! [`SqliteStore`], the SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use attend_core::{
  registration::{RegisterOutcome, Registration},
  store::AttendanceStore,
  subject::Subject,
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawRegistration, SUBJECT_COLUMNS, encode_dt, subject_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An attendance store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = Error;

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn upsert_subject(&self, subject: Subject) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (
             hemis_id, record_id, name,
             faculty_id, faculty_name, group_id, group_name
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (hemis_id) DO UPDATE SET
             record_id    = excluded.record_id,
             name         = excluded.name,
             faculty_id   = excluded.faculty_id,
             faculty_name = excluded.faculty_name,
             group_id     = excluded.group_id,
             group_name   = excluded.group_name",
          rusqlite::params![
            subject.hemis_id,
            subject.record_id,
            subject.name,
            subject.faculty.id,
            subject.faculty.name,
            subject.group.id,
            subject.group.name,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_subject(&self, hemis_id: i64) -> Result<Option<Subject>> {
    let subject = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE hemis_id = ?1"),
              rusqlite::params![hemis_id],
              subject_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(subject)
  }

  async fn list_subjects(&self) -> Result<Vec<Subject>> {
    let subjects = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY hemis_id"
        ))?;
        let rows = stmt
          .query_map([], subject_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(subjects)
  }

  // ── Registrations ─────────────────────────────────────────────────────────

  async fn register(&self, hemis_id: i64, chat_id: i64) -> Result<RegisterOutcome> {
    let at_str = encode_dt(Utc::now());

    let (inserted, raw): (bool, Option<RawRegistration>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "INSERT INTO registrations (hemis_id, chat_id, registered_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (hemis_id) DO NOTHING",
          rusqlite::params![hemis_id, chat_id, at_str],
        )?;
        let raw = tx
          .query_row(
            "SELECT hemis_id, chat_id, registered_at
             FROM registrations WHERE hemis_id = ?1",
            rusqlite::params![hemis_id],
            RawRegistration::from_row,
          )
          .optional()?;
        tx.commit()?;
        Ok((changed == 1, raw))
      })
      .await?;

    let registration = raw
      .ok_or(Error::RegistrationVanished(hemis_id))?
      .into_registration()?;

    Ok(if inserted {
      RegisterOutcome::Registered(registration)
    } else {
      RegisterOutcome::AlreadyRegistered(registration)
    })
  }

  async fn get_registration(&self, hemis_id: i64) -> Result<Option<Registration>> {
    let raw: Option<RawRegistration> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT hemis_id, chat_id, registered_at
               FROM registrations WHERE hemis_id = ?1",
              rusqlite::params![hemis_id],
              RawRegistration::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRegistration::into_registration).transpose()
  }

  async fn list_registrations(&self) -> Result<Vec<Registration>> {
    let raws: Vec<RawRegistration> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT hemis_id, chat_id, registered_at
           FROM registrations ORDER BY hemis_id",
        )?;
        let rows = stmt
          .query_map([], RawRegistration::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRegistration::into_registration).collect()
  }
}
