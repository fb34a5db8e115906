//! Concurrent per-user profile enrichment.
//!
//! Each contributor gets one lookup against `/users/{login}` to pick up a
//! display name and biography. Lookups run concurrently; a failed lookup
//! degrades that single record to fallback values and never fails the batch.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use contribsync_shared::{ContribSyncError, Contributor, EnrichedContributor, Result, SyncConfig};

/// Wire shape of the profile endpoint — both fields may be `null` for
/// accounts that never filled them in.
#[derive(Debug, Deserialize)]
struct UserProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bio: Option<String>,
}

/// Enriches contributor records with profile-lookup fields.
pub struct ProfileEnricher {
    client: Client,
    api_base: Url,
}

impl ProfileEnricher {
    /// Create a new enricher from the runtime configuration.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        Ok(Self {
            client: crate::build_client()?,
            api_base: crate::parse_api_base(&config.api_base)?,
        })
    }

    /// Enrich every contributor with its profile fields.
    ///
    /// All lookups for the batch are spawned at once — one task per record,
    /// no concurrency bound — and the join handles are awaited in spawn
    /// order, so the output has the same length and order as the input no
    /// matter in which order lookups complete. Individual failures are
    /// absorbed into fallback values; the call itself only fails if a task
    /// cannot be joined.
    #[instrument(skip_all, fields(count = contributors.len()))]
    pub async fn enrich(&self, contributors: Vec<Contributor>) -> Result<Vec<EnrichedContributor>> {
        let mut handles = Vec::with_capacity(contributors.len());

        for contributor in contributors {
            let client = self.client.clone();
            let url = self.api_base.join(&format!("users/{}", contributor.login));

            handles.push(tokio::spawn(async move {
                let url = match url {
                    Ok(url) => url,
                    Err(e) => {
                        debug!(login = %contributor.login, error = %e, "bad profile URL, using fallback");
                        return fallback(contributor);
                    }
                };

                match lookup_profile(&client, &url).await {
                    Ok(profile) => merged(contributor, profile),
                    Err(e) => {
                        debug!(login = %contributor.login, error = %e, "profile lookup failed, using fallback");
                        fallback(contributor)
                    }
                }
            }));
        }

        let mut enriched = Vec::with_capacity(handles.len());
        for handle in handles {
            let record = handle.await.map_err(|e| {
                ContribSyncError::Enrichment(format!("profile lookup task failed: {e}"))
            })?;
            enriched.push(record);
        }

        Ok(enriched)
    }
}

/// Fetch and decode one user profile.
async fn lookup_profile(client: &Client, url: &Url) -> Result<UserProfile> {
    let response = client
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

    serde_json::from_str(&body).map_err(|e| ContribSyncError::decode(format!("{url}: {e}")))
}

/// Merge a contributor with its profile, filling null fields with fallbacks.
fn merged(contributor: Contributor, profile: UserProfile) -> EnrichedContributor {
    let name = profile
        .name
        .unwrap_or_else(|| contributor.login.clone());
    let bio = profile.bio.unwrap_or_default();
    EnrichedContributor {
        contributor,
        name,
        bio,
    }
}

/// Fallback enrichment: the login stands in for the display name.
fn fallback(contributor: Contributor) -> EnrichedContributor {
    let name = contributor.login.clone();
    EnrichedContributor {
        contributor,
        name,
        bio: String::new(),
    }
}
