//! SQL schema for the attendance SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Mirror of the remote roster. Rows are upserted by hemis_id, never deleted.
CREATE TABLE IF NOT EXISTS subjects (
    hemis_id     INTEGER PRIMARY KEY,
    record_id    INTEGER NOT NULL,
    name         TEXT    NOT NULL,
    faculty_id   INTEGER NOT NULL,
    faculty_name TEXT    NOT NULL,
    group_id     INTEGER NOT NULL,
    group_name   TEXT    NOT NULL
);

-- At most one chat per student. Rows are never updated or deleted.
CREATE TABLE IF NOT EXISTS registrations (
    hemis_id      INTEGER PRIMARY KEY REFERENCES subjects(hemis_id),
    chat_id       INTEGER NOT NULL,
    registered_at TEXT    NOT NULL   -- ISO 8601 UTC; store-assigned
);

PRAGMA user_version = 1;
";
