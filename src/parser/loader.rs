//! Reads requirements files from disk and inlines their includes

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{Entry, Role};

/// Error type for loading requirements files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{path} is included recursively")]
    IncludeCycle { path: PathBuf },
}

impl LoadError {
    /// The underlying I/O error kind, if reading a file failed
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            LoadError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Load the roles declared in the requirements file at `path`.
///
/// `include:` entries are replaced in place by the roles of the included
/// file, resolved relative to the directory of the including file.
pub fn load_roles(parser: &dyn Parser, path: &Path) -> Result<Vec<Role>, LoadError> {
    let mut roles = Vec::new();
    let mut stack = Vec::new();
    load_into(parser, path, &mut stack, &mut roles)?;
    Ok(roles)
}

fn load_into(
    parser: &dyn Parser,
    path: &Path,
    stack: &mut Vec<PathBuf>,
    roles: &mut Vec<Role>,
) -> Result<(), LoadError> {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if stack.contains(&key) {
        return Err(LoadError::IncludeCycle {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parser.parse(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Parsed {} entries from {}", entries.len(), path.display());

    stack.push(key);
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for entry in entries {
        match entry {
            Entry::Role(role) => roles.push(role),
            Entry::Include(include) => load_into(parser, &base.join(include), stack, roles)?,
        }
    }
    stack.pop();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::requirements::RequirementsParser;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_roles_inlines_includes_in_order() {
        let dir = TempDir::new().unwrap();
        let main = write(
            &dir,
            "requirements.yml",
            "- src: first.role\n- include: nested/web.yml\n- src: last.role\n",
        );
        write(&dir, "nested/web.yml", "- src: web.nginx\n- src: web.php\n");

        let roles = load_roles(&RequirementsParser::new(), &main).unwrap();
        let sources: Vec<_> = roles.iter().map(|r| r.source.as_str()).collect();

        assert_eq!(sources, vec!["first.role", "web.nginx", "web.php", "last.role"]);
    }

    #[test]
    fn load_roles_rejects_include_cycles() {
        let dir = TempDir::new().unwrap();
        let main = write(&dir, "a.yml", "- include: b.yml\n");
        write(&dir, "b.yml", "- src: some.role\n- include: a.yml\n");

        let result = load_roles(&RequirementsParser::new(), &main);

        assert!(matches!(result, Err(LoadError::IncludeCycle { .. })));
    }

    #[test]
    fn load_roles_allows_including_same_file_twice() {
        let dir = TempDir::new().unwrap();
        let main = write(&dir, "a.yml", "- include: b.yml\n- include: b.yml\n");
        write(&dir, "b.yml", "- src: some.role\n");

        let roles = load_roles(&RequirementsParser::new(), &main).unwrap();

        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn load_roles_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_roles(&RequirementsParser::new(), &dir.path().join("missing.yml"));

        let err = result.unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn load_roles_reports_parse_errors_with_path() {
        let dir = TempDir::new().unwrap();
        let main = write(&dir, "broken.yml", "just a string\n");

        let err = load_roles(&RequirementsParser::new(), &main).unwrap_err();

        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("broken.yml"));
    }
}
