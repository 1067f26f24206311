//! Compares a declared version against the versions published upstream

use crate::lint::outcome::Outcome;
use crate::version::semver::{find_semantic_max, parse_version};
use crate::version::types::PackageVersions;

/// Decide the verdict for a role pinned to `declared` (empty when unpinned).
///
/// `available` must not be empty. Tags that are not semantic versions take no
/// part in picking the latest one; when no tag is a semantic version, the last
/// tag listed upstream is suggested. A declared version that is not a semantic
/// version (a branch such as `master`) is never considered found.
pub fn reconcile(declared: &str, available: &PackageVersions) -> Outcome {
    let latest = find_semantic_max(available.iter())
        .or_else(|| available.iter().last())
        .unwrap_or_default()
        .to_string();

    if parse_version(declared).is_none() || !available.contains(declared) {
        return Outcome::DeclaredVersionNotFound {
            declared: declared.to_string(),
            available: available.to_vec(),
            suggested: latest,
        };
    }

    if declared == latest {
        return Outcome::AlreadyLatest { version: latest };
    }

    Outcome::Outdated {
        from: declared.to_string(),
        to: latest,
    }
}
