//! Subject: a student tracked by the remote attendance system.
//!
//! Subjects are copied from the remote roster by the sync job and are keyed
//! by their HEMIS identifier, which is stable across the remote's own row ids.

use serde::{Deserialize, Serialize};

/// A reference to an organisational unit (faculty or group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRef {
  pub id:   i64,
  pub name: String,
}

/// A student as listed by the remote roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  /// The remote row id; not used as a key.
  #[serde(rename = "id")]
  pub record_id: i64,
  pub name:      String,
  /// External identifier, unique and stable.
  pub hemis_id:  i64,
  pub faculty:   UnitRef,
  pub group:     UnitRef,
}
