//! Manifest test utilities

use std::path::PathBuf;

use tempfile::TempDir;

/// Write `content` to `name` inside `dir` and return its path
pub fn write_manifest(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
