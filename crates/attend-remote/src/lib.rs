//! HTTP client for the remote attendance API.
//!
//! [`RemoteClient`] implements [`attend_core::source::AttendanceApi`] over
//! three JSON listings:
//!
//! | Method | Path | Query |
//! |--------|------|-------|
//! | `GET`  | `/api/main/students` | `page` |
//! | `GET`  | `/api/main/note_comers` | `faculty_id`, `day`, `page` |
//! | `GET`  | `/api/faculties` | |

mod client;
pub mod error;
pub mod wire;

pub use client::{ApiConfig, RemoteClient};
pub use error::{Error, Result};
