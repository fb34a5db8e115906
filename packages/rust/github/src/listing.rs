//! Paginated contributors-listing client.
//!
//! One request per page against `/repos/{owner}/{name}/contributors`;
//! the first empty page terminates pagination.

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use contribsync_shared::{ContribSyncError, Contributor, Result, SyncConfig};

/// Client for the paginated contributors listing of a single repository.
pub struct ContributorsClient {
    client: Client,
    api_base: Url,
    repo: String,
    page_size: u32,
}

impl ContributorsClient {
    /// Create a new listing client from the runtime configuration.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        Ok(Self {
            client: crate::build_client()?,
            api_base: crate::parse_api_base(&config.api_base)?,
            repo: config.repo.clone(),
            page_size: config.page_size,
        })
    }

    /// Fetch one page of the contributors listing.
    ///
    /// An empty page is the end-of-list signal, not an error. No retries:
    /// retry policy, if any, belongs to the caller.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<Contributor>> {
        let url = self.page_url(page)?;
        debug!(%url, "fetching contributor page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ContribSyncError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContribSyncError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ContribSyncError::Network(format!("{url}: body read failed: {e}")))?;

        serde_json::from_str(&body)
            .map_err(|e| ContribSyncError::decode(format!("contributor page {page}: {e}")))
    }

    /// Fetch the complete listing, page by page, starting at page 1.
    ///
    /// Pages are requested strictly sequentially and concatenated in page
    /// order. A partial page does not terminate the loop; only an empty page
    /// does, so a listing of exactly N full pages still costs N+1 requests.
    /// Any page error aborts the whole pass — partial accumulation is never
    /// returned.
    #[instrument(skip_all, fields(repo = %self.repo))]
    pub async fn fetch_all(&self) -> Result<Vec<Contributor>> {
        let mut contributors: Vec<Contributor> = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(page).await?;
            if batch.is_empty() {
                break;
            }
            contributors.extend(batch);
            page += 1;
        }

        info!(
            count = contributors.len(),
            requests = page,
            "contributor listing complete"
        );

        Ok(contributors)
    }

    /// Build the listing URL for a page index.
    fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = self
            .api_base
            .join(&format!("repos/{}/contributors", self.repo))
            .map_err(|e| {
                ContribSyncError::config(format!("invalid repo slug '{}': {e}", self.repo))
            })?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.page_size.to_string());
        Ok(url)
    }
}
