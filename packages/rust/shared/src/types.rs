//! Core domain types for the contributor snapshot.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Contributor
// ---------------------------------------------------------------------------

/// One entry from the paginated contributors listing.
///
/// The URL fields are carried through untouched for the docs page; this tool
/// never interprets them. Unknown fields in the remote payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Unique identifier assigned by the remote source.
    pub id: u64,
    /// Account handle, also the key for the profile lookup.
    pub login: String,
    /// Number of contributions to the repository.
    pub contributions: u64,
    /// Avatar image URL (passthrough).
    pub avatar_url: String,
    /// Public profile URL (passthrough).
    pub html_url: String,
    /// Whether the account is a site admin on the remote host.
    #[serde(default)]
    pub site_admin: bool,
}

// ---------------------------------------------------------------------------
// EnrichedContributor
// ---------------------------------------------------------------------------

/// A [`Contributor`] merged with the display fields from the profile lookup.
///
/// When the lookup fails (or returns no value for a field), `name` falls back
/// to the login and `bio` to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedContributor {
    #[serde(flatten)]
    pub contributor: Contributor,
    /// Display name shown on the contributors page.
    pub name: String,
    /// Short biography, possibly empty.
    pub bio: String,
}

/// The persisted snapshot: an ordered list of enriched contributors,
/// serialized as a plain JSON array. Order is page order, then whatever
/// order the remote source returned within each page.
pub type Snapshot = Vec<EnrichedContributor>;
