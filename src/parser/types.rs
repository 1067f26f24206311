//! Common types for the requirements parser

/// Upstream source a role's versions are fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryType {
    /// Tags of a remote Git repository
    Git,
    /// Ansible Galaxy role index
    Galaxy,
}

impl RegistryType {
    /// Returns the string representation of the registry type
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryType::Git => "git",
            RegistryType::Galaxy => "galaxy",
        }
    }
}

/// A role dependency declared in a requirements file.
///
/// Absent fields are empty strings rather than `None` so that comparisons
/// against upstream data stay simple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Role {
    /// Where the role comes from: a URL, an archive path or a Galaxy `namespace.name`
    pub source: String,
    /// Explicit source control system (e.g. "git")
    pub scm: String,
    /// Pinned version, empty when the role is unpinned
    pub version: String,
    /// Display name
    pub name: String,
}

impl Role {
    /// Name used when reporting about this role, `source` when no name was given
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.source
        } else {
            &self.name
        }
    }

    /// String used to look the role up upstream, `name` when no source was given
    pub fn location(&self) -> &str {
        if self.source.is_empty() {
            &self.name
        } else {
            &self.source
        }
    }
}

/// A single entry of a requirements file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Role(Role),
    /// Another requirements file to be inlined at this position
    Include(String),
}
