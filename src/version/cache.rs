//! Per-run cache of upstream fetch results
//!
//! Only what was fetched is cached, never a verdict: two declarations of the
//! same role pinned to different versions share one upstream call but are
//! each reconciled against their own pinned version.

use std::collections::HashMap;

use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::parser::types::{RegistryType, Role};
use crate::version::error::FetchError;
use crate::version::types::PackageVersions;

/// Stable hash identifying what a fetch looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprint of the upstream lookup a role triggers on the given registry
    ///
    /// Covers the registry and the role's location (`source`, or `name` for
    /// Galaxy roles declared by name only); scm, version and display name do
    /// not change which versions exist upstream.
    pub fn of(registry_type: RegistryType, role: &Role) -> Self {
        let key = format!("{}\0{}", registry_type.as_str(), role.location());
        Self(xxh3_64(key.as_bytes()))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Upstream failure, kept so later declarations of the same role report it too
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub detail: String,
    /// The upstream does not know the role at all
    pub not_found: bool,
}

impl From<&FetchError> for FetchFailure {
    fn from(err: &FetchError) -> Self {
        Self {
            detail: err.to_string(),
            not_found: matches!(err, FetchError::NotFound(_)),
        }
    }
}

/// Outcome of a finished fetch: the versions, or the upstream failure
pub type CachedFetch = Result<PackageVersions, FetchFailure>;

/// Fetch results of the current run, keyed by fingerprint
#[derive(Debug, Default)]
pub struct Cache {
    entries: HashMap<Fingerprint, CachedFetch>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: Fingerprint) -> Option<&CachedFetch> {
        self.entries.get(&fingerprint)
    }

    pub fn insert(&mut self, fingerprint: Fingerprint, fetch: CachedFetch) {
        debug!("Caching fetch result {}", fingerprint);
        self.entries.insert(fingerprint, fetch);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
