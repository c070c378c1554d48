//! Read-only reference data fetched fresh on every notification cycle.
//!
//! Nothing in this module is persisted.

use serde::{Deserialize, Serialize};

/// An organisational unit that absence reports are requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
  pub id:   i64,
  #[serde(rename = "faculty")]
  pub name: String,
}

/// A student named in an absence report. Carries no unit detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsentStudent {
  pub id:       i64,
  pub name:     String,
  pub hemis_id: i64,
}

/// One group's absence report for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceGroup {
  pub group_id:        i64,
  pub group_name:      String,
  pub total_students:  u32,
  #[serde(rename = "absent_students_count")]
  pub absent_count:    u32,
  pub absent_students: Vec<AbsentStudent>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_remote_field_names() {
    let raw = r#"{
      "group_id": 7,
      "group_name": "CS-21",
      "total_students": 25,
      "absent_students_count": 1,
      "absent_students": [{"id": 101, "name": "Ana", "hemis_id": 555}]
    }"#;
    let group: AbsenceGroup = serde_json::from_str(raw).unwrap();
    assert_eq!(group.absent_count, 1);
    assert_eq!(group.absent_students[0].hemis_id, 555);

    let faculty: Faculty =
      serde_json::from_str(r#"{"id": 1, "faculty": "Engineering"}"#).unwrap();
    assert_eq!(faculty.name, "Engineering");
  }
}
