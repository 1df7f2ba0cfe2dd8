//! Per-path lifecycle metadata

use serde::Serialize;

use super::expiry::StoredAt;

/// Lifecycle record for one cache path.
///
/// Exists conceptually for every path: reads of an unknown path yield
/// [`Metadata::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// A fetch has completed at least once
    pub loaded: bool,
    /// A fetch is in flight
    pub loading: bool,
    /// Loaded and not explicitly expired (TTL staleness is checked at read time)
    pub current: bool,
    /// The current agent owns the resource
    pub writable: bool,
    /// Commit time
    pub stored_at: StoredAt,

    pub updating: bool,
    pub deprecating: bool,
    pub unpublishing: bool,
}

/// Flags raised only while a mutation is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientFlag {
    Updating,
    Deprecating,
    Unpublishing,
}

impl Metadata {
    pub fn flag(&self, flag: TransientFlag) -> bool {
        match flag {
            TransientFlag::Updating => self.updating,
            TransientFlag::Deprecating => self.deprecating,
            TransientFlag::Unpublishing => self.unpublishing,
        }
    }

    /// Any mutation in flight
    pub fn is_busy(&self) -> bool {
        self.updating || self.deprecating || self.unpublishing
    }

    /// Shallow-merge the fields set in `patch`
    pub fn merge(&mut self, patch: &MetadataPatch) {
        if let Some(v) = patch.loaded {
            self.loaded = v;
        }
        if let Some(v) = patch.loading {
            self.loading = v;
        }
        if let Some(v) = patch.current {
            self.current = v;
        }
        if let Some(v) = patch.writable {
            self.writable = v;
        }
        if let Some(v) = patch.stored_at {
            self.stored_at = v;
        }
        if let Some(v) = patch.updating {
            self.updating = v;
        }
        if let Some(v) = patch.deprecating {
            self.deprecating = v;
        }
        if let Some(v) = patch.unpublishing {
            self.unpublishing = v;
        }
    }
}

/// Partial metadata update; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    pub loaded: Option<bool>,
    pub loading: Option<bool>,
    pub current: Option<bool>,
    pub writable: Option<bool>,
    pub stored_at: Option<StoredAt>,
    pub updating: Option<bool>,
    pub deprecating: Option<bool>,
    pub unpublishing: Option<bool>,
}

impl MetadataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(mut self, value: bool) -> Self {
        self.loaded = Some(value);
        self
    }

    pub fn loading(mut self, value: bool) -> Self {
        self.loading = Some(value);
        self
    }

    pub fn current(mut self, value: bool) -> Self {
        self.current = Some(value);
        self
    }

    pub fn writable(mut self, value: bool) -> Self {
        self.writable = Some(value);
        self
    }

    pub fn stored_at(mut self, value: StoredAt) -> Self {
        self.stored_at = Some(value);
        self
    }

    pub fn flag(mut self, flag: TransientFlag, value: bool) -> Self {
        match flag {
            TransientFlag::Updating => self.updating = Some(value),
            TransientFlag::Deprecating => self.deprecating = Some(value),
            TransientFlag::Unpublishing => self.unpublishing = Some(value),
        }
        self
    }
}
