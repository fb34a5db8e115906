//! Aggregation orchestration for contribsync.
//!
//! Ties the listing client, profile enricher, and snapshot store together
//! into the one operation the docs build calls.

pub mod aggregator;

pub use aggregator::{
    Aggregator, ProgressReporter, SilentProgress, SnapshotSource, SyncReport,
};
