//! Async HTTP client wrapping the remote attendance API.

use std::time::Duration;

use attend_core::{
  FetchError,
  listing::{AbsenceGroup, Faculty},
  pagination::Page,
  source::AttendanceApi,
  subject::Subject,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::{
  Result,
  wire::{FacultyListing, Listing},
};

/// Connection settings for the remote API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

/// Async HTTP client for the remote attendance API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RemoteClient {
  client: reqwest::Client,
  config: ApiConfig,
}

impl RemoteClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = reqwest::Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET` `path` and decode the body as `T`.
  ///
  /// `page` only labels errors; callers put it in `query` themselves.
  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, String)],
    page: u32,
  ) -> Result<T, FetchError> {
    let transport = |reason: String| FetchError::Transport { page, reason };

    let resp = self
      .client
      .get(self.url(path))
      .query(query)
      .send()
      .await
      .map_err(|e| transport(format!("GET {path} failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(transport(format!("GET {path} → {status}")));
    }

    let body = resp
      .bytes()
      .await
      .map_err(|e| transport(format!("reading GET {path} body: {e}")))?;

    serde_json::from_slice(&body).map_err(|e| FetchError::Validation {
      page,
      reason: format!("GET {path}: {e}"),
    })
  }

  async fn listing<T: DeserializeOwned>(
    &self,
    path: &str,
    mut query: Vec<(&str, String)>,
    page: u32,
  ) -> Result<Page<T>, FetchError> {
    query.push(("page", page.to_string()));
    let listing: Listing<T> = self.get_json(path, &query, page).await?;
    if !listing.success {
      return Err(FetchError::Validation {
        page,
        reason: format!("GET {path} reported success=false"),
      });
    }
    tracing::debug!(
      path,
      page,
      last_page = listing.pagination.last_page,
      items = listing.data.len(),
      "fetched listing page"
    );
    Ok(listing.into_page())
  }
}

impl AttendanceApi for RemoteClient {
  /// `GET /api/main/students?page=<n>`
  async fn students(&self, page: u32) -> Result<Page<Subject>, FetchError> {
    self.listing("/main/students", Vec::new(), page).await
  }

  /// `GET /api/main/note_comers?faculty_id=<id>&day=<YYYY-MM-DD>&page=<n>`
  async fn absences(
    &self,
    faculty_id: i64,
    day: NaiveDate,
    page: u32,
  ) -> Result<Page<AbsenceGroup>, FetchError> {
    let query = vec![
      ("faculty_id", faculty_id.to_string()),
      ("day", day.format("%Y-%m-%d").to_string()),
    ];
    self.listing("/main/note_comers", query, page).await
  }

  /// `GET /api/faculties`
  async fn faculties(&self) -> Result<Vec<Faculty>, FetchError> {
    let listing: FacultyListing = self.get_json("/faculties", &[], 1).await?;
    if !listing.success {
      return Err(FetchError::Validation {
        page:   1,
        reason: "GET /faculties reported success=false".into(),
      });
    }
    tracing::debug!(
      total = listing.total,
      items = listing.data.len(),
      "fetched faculty list"
    );
    Ok(listing.data)
  }
}
