//! Lint verdicts for role declarations

use crate::parser::types::Role;

/// Importance of a lint result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Nothing to act on
    Info,
    /// Must be brought to the attention of the user
    Warning,
    /// The role could not be checked
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERR",
        }
    }
}

/// Verdict on a single role declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The declared version is the latest one
    AlreadyLatest { version: String },
    /// A newer version than the declared one exists
    Outdated { from: String, to: String },
    /// The declared version is missing, unpinned or not among the published ones
    DeclaredVersionNotFound {
        declared: String,
        available: Vec<String>,
        suggested: String,
    },
    /// Archives served by arbitrary web servers cannot be checked
    UndetectableArchive,
    /// The `scm` field names a source control system we do not know
    UnknownSourceType { scm: String },
    /// Fetching the published versions failed; `not_found` when the upstream
    /// does not know the role
    UpstreamError { detail: String, not_found: bool },
}

impl Outcome {
    pub fn severity(&self) -> Severity {
        match self {
            Outcome::AlreadyLatest { .. } | Outcome::UndetectableArchive => Severity::Info,
            Outcome::Outdated { .. } | Outcome::DeclaredVersionNotFound { .. } => {
                Severity::Warning
            }
            Outcome::UnknownSourceType { .. } | Outcome::UpstreamError { .. } => Severity::Error,
        }
    }

    /// Version the role should be pinned to, if one could be determined
    pub fn latest_version(&self) -> Option<&str> {
        match self {
            Outcome::AlreadyLatest { version } => Some(version),
            Outcome::Outdated { to, .. } => Some(to),
            Outcome::DeclaredVersionNotFound { suggested, .. } => Some(suggested),
            _ => None,
        }
    }
}

/// A role declaration paired with its verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResult {
    pub role: Role,
    pub outcome: Outcome,
}

impl ClassifiedResult {
    pub fn new(role: Role, outcome: Outcome) -> Self {
        Self { role, outcome }
    }

    pub fn severity(&self) -> Severity {
        self.outcome.severity()
    }
}
