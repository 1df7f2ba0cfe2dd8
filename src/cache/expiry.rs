//! Expiration policy

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::metadata::Metadata;

/// When a path's value was committed.
///
/// Variant order gives the staleness order: a tombstone is older than any
/// commit, and a path never written sorts after everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StoredAt {
    /// Explicitly expired (unpublished); always stale
    Tombstone,
    /// Committed at this instant
    At(DateTime<Utc>),
    /// Never committed; never expires on its own
    #[default]
    Never,
}

impl StoredAt {
    /// True when more than `ttl` has elapsed since the commit.
    ///
    /// Exactly `ttl` elapsed still counts as fresh. Commit times in the
    /// future (clock skew) count as fresh.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match self {
            StoredAt::Never => false,
            StoredAt::Tombstone => true,
            StoredAt::At(stored) => now
                .signed_duration_since(*stored)
                .to_std()
                .map(|elapsed| elapsed > ttl)
                .unwrap_or(false),
        }
    }
}

/// Staleness check for a metadata record.
///
/// A path that was never written is not expired; callers also check
/// `loaded` to tell "fresh" from "absent".
pub fn is_expired(metadata: &Metadata, now: DateTime<Utc>, ttl: Duration) -> bool {
    metadata.stored_at.is_expired(now, ttl)
}
