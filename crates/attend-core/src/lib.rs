//! Core types and trait definitions for the attendance notifier.
//!
//! This crate has no HTTP or database dependencies. The storage backend, the
//! remote attendance API and the delivery channel are described here as
//! traits and implemented by sibling crates.

pub mod error;
pub mod listing;
pub mod notify;
pub mod pagination;
pub mod registration;
pub mod source;
pub mod store;
pub mod subject;

pub use error::{Error, FetchError, Result};
