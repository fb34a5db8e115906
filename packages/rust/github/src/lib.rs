//! GitHub API clients for the contributor aggregation pipeline.
//!
//! This crate provides:
//! - [`listing`] — Paginated contributors-listing client
//! - [`profile`] — Concurrent per-user profile enrichment
//!
//! Both clients are parameterized by the API base URL so tests can point
//! them at a mock server.

pub mod listing;
pub mod profile;

pub use listing::ContributorsClient;
pub use profile::ProfileEnricher;

use contribsync_shared::{ContribSyncError, Result};
use url::Url;

/// User-Agent string for API requests (the listing host rejects anonymous clients).
pub(crate) const USER_AGENT: &str = concat!("contribsync/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client configuration.
///
/// No request timeout is set: the aggregation is a one-shot run and a stalled
/// call stalls the whole invocation rather than producing a partial result.
pub(crate) fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| ContribSyncError::Network(format!("failed to build HTTP client: {e}")))
}

/// Parse the configured API base into a [`Url`].
pub(crate) fn parse_api_base(api_base: &str) -> Result<Url> {
    Url::parse(api_base)
        .map_err(|e| ContribSyncError::config(format!("invalid api_base '{api_base}': {e}")))
}
