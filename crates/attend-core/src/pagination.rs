//! Paginated listings and the [`Pages`] producer that walks them.
//!
//! Remote listings are split into numbered pages, each carrying a
//! [`Pagination`] envelope. [`Pages`] requests them one at a time starting at
//! page 1 and stops after the page whose `current_page` reaches `last_page`,
//! or after the first failure. It cannot be restarted; build a new one to
//! walk the listing again.

use std::{future::Future, marker::PhantomData};

use serde::{Deserialize, Serialize};

use crate::FetchError;

// ─── Envelope ────────────────────────────────────────────────────────────────

/// Position of one page within a multi-page listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  /// Total number of items across all pages.
  pub total:        u64,
  pub current_page: u32,
  pub last_page:    u32,
  pub per_page:     u32,
  /// Reported by some listings; redundant with `last_page`.
  #[serde(default)]
  pub total_pages:  Option<u32>,
}

impl Pagination {
  /// Whether this is the final page of the listing.
  pub fn is_last(&self) -> bool { self.current_page >= self.last_page }
}

/// One decoded page: its items plus the envelope it arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
  pub items:      Vec<T>,
  pub pagination: Pagination,
}

// ─── Producer ────────────────────────────────────────────────────────────────

/// A finite, pull-based sequence of pages.
///
/// `fetch` is called with the 1-based page number and must return that page.
/// [`Pages::next_page`] yields `Some(Ok(page))` for every page in order,
/// `Some(Err(_))` at most once, and `None` once the listing is exhausted or
/// has failed.
pub struct Pages<F, T> {
  fetch: F,
  next:  Option<u32>,
  _item: PhantomData<fn() -> T>,
}

impl<F, Fut, T> Pages<F, T>
where
  F: FnMut(u32) -> Fut,
  Fut: Future<Output = Result<Page<T>, FetchError>>,
{
  pub fn new(fetch: F) -> Self {
    Self { fetch, next: Some(1), _item: PhantomData }
  }

  /// `true` once no further page will be requested.
  pub fn is_done(&self) -> bool { self.next.is_none() }

  /// Fetch and return the next page.
  pub async fn next_page(&mut self) -> Option<Result<Page<T>, FetchError>> {
    let number = self.next.take()?;

    let page = match (self.fetch)(number).await {
      Ok(page) => page,
      Err(e) => return Some(Err(e)),
    };

    // An empty listing reports `last_page == 0`; nothing to yield.
    if number > page.pagination.last_page {
      return None;
    }

    if page.pagination.current_page != number {
      return Some(Err(FetchError::Validation {
        page:   number,
        reason: format!(
          "requested page {number} but received page {}",
          page.pagination.current_page
        ),
      }));
    }

    if !page.pagination.is_last() {
      self.next = Some(number + 1);
    }
    Some(Ok(page))
  }
}
