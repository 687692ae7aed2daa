//! File formatting: typed CSV tables and pretty JSON.

pub mod csv;
pub mod json;

use std::path::{Path, PathBuf};

use crate::error::{ToolError, ToolResult};

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> ToolResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .map_err(|source| ToolError::Io { path: dir.to_path_buf(), source }),
        _ => Ok(()),
    }
}

/// `<results_dir>/<subdir>/<name>`; an absolute `name` is returned unchanged.
#[must_use]
pub fn results_path(results_dir: &Path, subdir: &str, name: &str) -> PathBuf {
    results_dir.join(subdir).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_path() {
        let path = results_path(Path::new("results"), "bib", "icse.csv");
        assert_eq!(path, Path::new("results/bib/icse.csv"));
    }

    #[test]
    fn test_results_path_absolute_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        let absolute = dir.path().join("out.csv");
        let path = results_path(Path::new("results"), "bib", absolute.to_str().unwrap());
        assert_eq!(path, absolute);
    }

    #[test]
    fn test_ensure_parent_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c.csv");
        ensure_parent_dir(&target).unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }

    #[test]
    fn test_ensure_parent_dir_bare_file_name() {
        ensure_parent_dir(Path::new("plain.csv")).unwrap();
    }
}
