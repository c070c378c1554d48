//! Attendance synchronisation and notification pipeline.
//!
//! - [`sync`] mirrors the remote student roster into the store.
//! - [`absence`] reads the day's absence reports per faculty.
//! - [`dispatch`] and [`cycle`] turn absences into one message per
//!   registered recipient.
//! - [`register`] and [`updates`] let parents bind a student id to their
//!   chat.
//! - [`schedule`] fires the daily cycle.
//!
//! Every component receives its collaborators through an explicitly built
//! [`Context`].

pub mod absence;
pub mod config;
pub mod context;
pub mod cycle;
pub mod dispatch;
pub mod error;
pub mod register;
pub mod schedule;
pub mod sync;
pub mod updates;

pub use config::BotConfig;
pub use context::Context;
pub use error::{Error, Result, SyncError};

#[cfg(test)]
mod tests;
