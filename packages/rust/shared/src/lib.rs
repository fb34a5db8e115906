//! Shared types, error model, and configuration for contribsync.
//!
//! This crate is the foundation depended on by all other contribsync crates.
//! It provides:
//! - [`ContribSyncError`] — the unified error type
//! - Domain types ([`Contributor`], [`EnrichedContributor`], [`Snapshot`])
//! - Configuration ([`AppConfig`], [`SyncConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GithubConfig, SnapshotConfig, SyncConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{ContribSyncError, Result};
pub use types::{Contributor, EnrichedContributor, Snapshot};
