use indexmap::IndexSet;

/// Version tags published upstream for a role, in the order the upstream listed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVersions {
    versions: IndexSet<String>,
}

impl PackageVersions {
    pub fn new(versions: Vec<String>) -> Self {
        versions.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn contains(&self, version: &str) -> bool {
        self.versions.contains(version)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.versions.iter().cloned().collect()
    }
}

impl FromIterator<String> for PackageVersions {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            versions: iter.into_iter().collect(),
        }
    }
}
