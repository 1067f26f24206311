//! Chooses the upstream source to check a role against

use crate::parser::types::{RegistryType, Role};

/// Suffixes of roles distributed as archives
const ARCHIVE_SUFFIXES: &[&str] = &[".tar.gz", ".gz", ".tar", ".zip"];

/// How a role declaration can be checked for updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Fetch the published versions from this registry
    Registry(RegistryType),
    /// Archive on an arbitrary web server, no version list to query
    Archive,
    /// `scm` names an unsupported source control system
    UnknownScm(String),
}

/// Classify a role declaration. The first matching rule wins.
pub fn select(role: &Role) -> Selection {
    if ARCHIVE_SUFFIXES
        .iter()
        .any(|suffix| role.source.ends_with(suffix))
    {
        return Selection::Archive;
    }

    match role.scm.as_str() {
        "git" => Selection::Registry(RegistryType::Git),
        // a bare URL is tried as a git repository
        "" if role.source.starts_with("http") => Selection::Registry(RegistryType::Git),
        "" => Selection::Registry(RegistryType::Galaxy),
        scm => Selection::UnknownScm(scm.to_string()),
    }
}
