//! Encoding and decoding helpers between domain types and SQLite rows.
//!
//! Timestamps are stored as RFC 3339 strings; everything else maps onto
//! plain INTEGER and TEXT columns.

use attend_core::{
  registration::Registration,
  subject::{Subject, UnitRef},
};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`subject_from_row`].
pub const SUBJECT_COLUMNS: &str =
  "hemis_id, record_id, name, faculty_id, faculty_name, group_id, group_name";

pub fn subject_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subject> {
  Ok(Subject {
    hemis_id:  row.get(0)?,
    record_id: row.get(1)?,
    name:      row.get(2)?,
    faculty:   UnitRef { id: row.get(3)?, name: row.get(4)? },
    group:     UnitRef { id: row.get(5)?, name: row.get(6)? },
  })
}

/// Raw values read directly from a `registrations` row.
pub struct RawRegistration {
  pub hemis_id:      i64,
  pub chat_id:       i64,
  pub registered_at: String,
}

impl RawRegistration {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      hemis_id:      row.get(0)?,
      chat_id:       row.get(1)?,
      registered_at: row.get(2)?,
    })
  }

  pub fn into_registration(self) -> Result<Registration> {
    Ok(Registration {
      hemis_id:      self.hemis_id,
      chat_id:       self.chat_id,
      registered_at: decode_dt(&self.registered_at)?,
    })
  }
}
