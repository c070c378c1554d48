//! Response bodies as the remote API sends them.

use attend_core::{
  listing::Faculty,
  pagination::{Page, Pagination},
};
use serde::Deserialize;

/// Body of every paginated listing.
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
  pub success:    bool,
  pub pagination: Pagination,
  pub data:       Vec<T>,
}

impl<T> Listing<T> {
  pub fn into_page(self) -> Page<T> {
    Page { items: self.data, pagination: self.pagination }
  }
}

/// Body of the single-page faculty listing.
#[derive(Debug, Deserialize)]
pub struct FacultyListing {
  pub success: bool,
  pub total:   u64,
  pub data:    Vec<Faculty>,
}
