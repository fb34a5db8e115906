//! The aggregation orchestrator.
//!
//! One invocation decides between a live refresh and the stored snapshot,
//! runs to completion, and never surfaces an error to its caller — the
//! worst case is an empty contributor list.

use std::time::Instant;

use tracing::{info, instrument, warn};

use contribsync_github::{ContributorsClient, ProfileEnricher};
use contribsync_shared::{EnrichedContributor, Result, SyncConfig};
use contribsync_snapshot::SnapshotStore;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Which path produced the returned contributor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Live refresh succeeded and the snapshot was rewritten.
    Refreshed,
    /// Served from the existing snapshot without touching the network.
    Cache,
    /// Live refresh failed; the previous snapshot was served instead.
    Fallback,
    /// Neither a refresh nor a stored snapshot was available.
    Empty,
}

/// Outcome of one aggregation run.
#[derive(Debug)]
pub struct SyncReport {
    /// The merged contributor list, possibly empty.
    pub contributors: Vec<EnrichedContributor>,
    /// The path that produced it.
    pub source: SnapshotSource,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting aggregation phases.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the run completes.
    fn done(&self, report: &SyncReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _report: &SyncReport) {}
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Contributor aggregation orchestrator.
///
/// All policy lives in the [`SyncConfig`] supplied at construction; the
/// `build` flag and the snapshot location are explicit inputs rather than
/// ambient process state.
pub struct Aggregator {
    config: SyncConfig,
    listing: ContributorsClient,
    enricher: ProfileEnricher,
    store: SnapshotStore,
    progress: Box<dyn ProgressReporter>,
}

impl Aggregator {
    /// Create an aggregator from the runtime configuration.
    pub fn new(config: SyncConfig) -> Result<Self> {
        let listing = ContributorsClient::new(&config)?;
        let enricher = ProfileEnricher::new(&config)?;
        let store = SnapshotStore::new(&config.snapshot_path);

        Ok(Self {
            config,
            listing,
            enricher,
            store,
            progress: Box::new(SilentProgress),
        })
    }

    /// Attach a progress reporter (the CLI passes a spinner; tests don't).
    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// The caller-facing operation: the merged contributor list, never an
    /// error. Worst case is the empty list.
    pub async fn get_contributors(&self) -> Vec<EnrichedContributor> {
        self.sync().await.contributors
    }

    /// Run one aggregation pass and report which path produced the result.
    #[instrument(skip_all, fields(repo = %self.config.repo, build = self.config.build))]
    pub async fn sync(&self) -> SyncReport {
        let start = Instant::now();
        let (contributors, source) = self.run().await;

        let report = SyncReport {
            contributors,
            source,
            elapsed: start.elapsed(),
        };
        self.progress.done(&report);

        info!(
            count = report.contributors.len(),
            source = ?report.source,
            elapsed_ms = report.elapsed.as_millis(),
            "aggregation complete"
        );

        report
    }

    async fn run(&self) -> (Vec<EnrichedContributor>, SnapshotSource) {
        // A build ships with fresh data baked in; otherwise an existing
        // snapshot wins and only a missing one forces the live path.
        if !self.config.build && self.store.exists() {
            self.progress.phase("Reading snapshot");
            return match self.store.read().await {
                Ok(snapshot) => (snapshot, SnapshotSource::Cache),
                Err(e) => {
                    warn!(error = %e, "stored snapshot unreadable");
                    (Vec::new(), SnapshotSource::Empty)
                }
            };
        }

        match self.refresh().await {
            Ok(snapshot) => (snapshot, SnapshotSource::Refreshed),
            Err(e) => {
                warn!(error = %e, "refresh failed, falling back to stored snapshot");
                self.progress.phase("Reading fallback snapshot");
                match self.store.read().await {
                    Ok(snapshot) => (snapshot, SnapshotSource::Fallback),
                    Err(read_err) => {
                        warn!(error = %read_err, "fallback read failed, returning empty list");
                        (Vec::new(), SnapshotSource::Empty)
                    }
                }
            }
        }
    }

    /// One complete live pass: paginate, enrich, persist.
    ///
    /// The snapshot is written only after both pagination and enrichment
    /// succeed in full; no partial result ever reaches disk.
    async fn refresh(&self) -> Result<Vec<EnrichedContributor>> {
        self.progress.phase("Fetching contributor pages");
        let contributors = self.listing.fetch_all().await?;

        self.progress.phase("Enriching profiles");
        let enriched = self.enricher.enrich(contributors).await?;

        self.progress.phase("Writing snapshot");
        self.store.write(&enriched).await?;

        Ok(enriched)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use contribsync_shared::Contributor;

    /// Port 1 on loopback refuses connections immediately.
    const UNREACHABLE: &str = "http://127.0.0.1:1";

    fn temp_snapshot_path() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cs-agg-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("contributors.json")
    }

    fn config(api_base: &str, snapshot_path: &std::path::Path, build: bool) -> SyncConfig {
        SyncConfig {
            repo: "acme/widgets".into(),
            api_base: api_base.into(),
            page_size: 100,
            snapshot_path: snapshot_path.into(),
            build,
        }
    }

    fn contributor_json(id: u64, login: &str) -> serde_json::Value {
        json!({
            "id": id,
            "login": login,
            "contributions": id * 10,
            "avatar_url": format!("https://avatars.example.com/u/{id}"),
            "html_url": format!("https://github.example.com/{login}"),
            "site_admin": false
        })
    }

    fn stored_contributor(id: u64, login: &str) -> EnrichedContributor {
        EnrichedContributor {
            contributor: Contributor {
                id,
                login: login.into(),
                contributions: id * 10,
                avatar_url: format!("https://avatars.example.com/u/{id}"),
                html_url: format!("https://github.example.com/{login}"),
                site_admin: false,
            },
            name: login.into(),
            bio: String::new(),
        }
    }

    /// Mount a two-user listing (ada, grace) plus their profiles.
    async fn mount_live_endpoints(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contributors"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                contributor_json(1, "ada"),
                contributor_json(2, "grace")
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contributors"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/ada"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Ada Lovelace",
                "bio": "Analyst"
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/grace"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Grace Hopper",
                "bio": "Compilers"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn build_context_refreshes_and_writes_snapshot() {
        let server = MockServer::start().await;
        mount_live_endpoints(&server).await;
        let snapshot_path = temp_snapshot_path();

        let aggregator =
            Aggregator::new(config(&server.uri(), &snapshot_path, true)).unwrap();
        let report = aggregator.sync().await;

        assert_eq!(report.source, SnapshotSource::Refreshed);
        assert_eq!(report.contributors.len(), 2);
        assert_eq!(report.contributors[0].name, "Ada Lovelace");
        assert_eq!(report.contributors[1].contributor.login, "grace");

        // The merged list reached disk.
        let written = SnapshotStore::new(&snapshot_path).read().await.unwrap();
        assert_eq!(written, report.contributors);

        let _ = std::fs::remove_dir_all(snapshot_path.parent().unwrap());
    }

    #[tokio::test]
    async fn missing_snapshot_refreshes_even_outside_build() {
        let server = MockServer::start().await;
        mount_live_endpoints(&server).await;
        let snapshot_path = temp_snapshot_path();

        let aggregator =
            Aggregator::new(config(&server.uri(), &snapshot_path, false)).unwrap();
        let report = aggregator.sync().await;

        assert_eq!(report.source, SnapshotSource::Refreshed);
        assert!(snapshot_path.exists());

        let _ = std::fs::remove_dir_all(snapshot_path.parent().unwrap());
    }

    #[tokio::test]
    async fn existing_snapshot_serves_cache_without_network() {
        let snapshot_path = temp_snapshot_path();
        let stored: Vec<EnrichedContributor> =
            (1..=5).map(|i| stored_contributor(i, &format!("user-{i}"))).collect();
        SnapshotStore::new(&snapshot_path).write(&stored).await.unwrap();

        // The API base is unreachable: a cache hit must not need it.
        let aggregator =
            Aggregator::new(config(UNREACHABLE, &snapshot_path, false)).unwrap();
        let report = aggregator.sync().await;

        assert_eq!(report.source, SnapshotSource::Cache);
        assert_eq!(report.contributors, stored);

        let _ = std::fs::remove_dir_all(snapshot_path.parent().unwrap());
    }

    #[tokio::test]
    async fn refresh_failure_falls_back_to_stored_snapshot() {
        let snapshot_path = temp_snapshot_path();
        let stored = vec![stored_contributor(1, "ada")];
        SnapshotStore::new(&snapshot_path).write(&stored).await.unwrap();

        let aggregator =
            Aggregator::new(config(UNREACHABLE, &snapshot_path, true)).unwrap();
        let report = aggregator.sync().await;

        assert_eq!(report.source, SnapshotSource::Fallback);
        assert_eq!(report.contributors, stored);

        let _ = std::fs::remove_dir_all(snapshot_path.parent().unwrap());
    }

    #[tokio::test]
    async fn unreachable_network_and_empty_store_returns_empty() {
        let snapshot_path = temp_snapshot_path();

        let aggregator =
            Aggregator::new(config(UNREACHABLE, &snapshot_path, true)).unwrap();
        let contributors = aggregator.get_contributors().await;

        assert!(contributors.is_empty());
        assert!(!snapshot_path.exists());

        let _ = std::fs::remove_dir_all(snapshot_path.parent().unwrap());
    }

    #[tokio::test]
    async fn failed_pagination_never_persists_partial_results() {
        let server = MockServer::start().await;
        // Page 1 succeeds, page 2 blows up mid-pagination.
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contributors"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                contributor_json(1, "ada")
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contributors"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let snapshot_path = temp_snapshot_path();
        let stored = vec![stored_contributor(9, "previous")];
        SnapshotStore::new(&snapshot_path).write(&stored).await.unwrap();

        let aggregator =
            Aggregator::new(config(&server.uri(), &snapshot_path, true)).unwrap();
        let report = aggregator.sync().await;

        // The old snapshot is served and survives on disk untouched.
        assert_eq!(report.source, SnapshotSource::Fallback);
        assert_eq!(report.contributors, stored);
        let on_disk = SnapshotStore::new(&snapshot_path).read().await.unwrap();
        assert_eq!(on_disk, stored);

        let _ = std::fs::remove_dir_all(snapshot_path.parent().unwrap());
    }

    #[tokio::test]
    async fn snapshot_write_failure_degrades_to_empty() {
        let server = MockServer::start().await;
        mount_live_endpoints(&server).await;

        // Pointing the snapshot at a directory makes the write (and the
        // fallback read) fail after a fully successful fetch.
        let dir = std::env::temp_dir().join(format!("cs-agg-dir-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();

        let aggregator = Aggregator::new(config(&server.uri(), &dir, true)).unwrap();
        let report = aggregator.sync().await;

        assert_eq!(report.source, SnapshotSource::Empty);
        assert!(report.contributors.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn corrupt_snapshot_on_cache_path_returns_empty() {
        let snapshot_path = temp_snapshot_path();
        std::fs::write(&snapshot_path, "not json at all").unwrap();

        let aggregator =
            Aggregator::new(config(UNREACHABLE, &snapshot_path, false)).unwrap();
        let contributors = aggregator.get_contributors().await;

        assert!(contributors.is_empty());

        let _ = std::fs::remove_dir_all(snapshot_path.parent().unwrap());
    }
}
