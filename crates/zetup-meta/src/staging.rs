//! Pip build-staging directories.
//!
//! While pip installs a package it unpacks downloaded requirements under
//! `<prefix>/build/` and drops a marker file there. Those unpacked trees
//! (and their `src/` children) need to be importable by build subprocesses.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Marker file pip leaves in its build directory.
pub const PIP_MARKER: &str = "pip-delete-this-directory.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStaging {
    build_dir: PathBuf,
    paths: Vec<PathBuf>,
}

impl BuildStaging {
    /// Inspect `<prefix>/build`. `None` when it is missing, unreadable, or
    /// has no pip marker.
    pub fn discover(prefix: &Path) -> Result<Option<Self>> {
        let build_dir = prefix.join("build");
        let entries = match fs::read_dir(&build_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %build_dir.display(), error = %e, "No build staging directory");
                return Ok(None);
            }
        };
        if !build_dir.join(PIP_MARKER).is_file() {
            return Ok(None);
        }

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        let mut paths = Vec::new();
        for dir in dirs {
            let dir = std::path::absolute(&dir).map_err(|e| Error::io(&dir, e))?;
            let src = dir.join("src");
            paths.push(dir);
            if src.is_dir() {
                paths.push(src);
            }
        }
        tracing::info!(count = paths.len(), "Discovered pip build staging paths");

        Ok(Some(Self { build_dir, paths }))
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Staging paths followed by `existing` (a current `PYTHONPATH`).
    pub fn pythonpath(&self, existing: Option<&OsStr>) -> Result<OsString> {
        let mut all = self.paths.clone();
        if let Some(existing) = existing.filter(|e| !e.is_empty()) {
            all.extend(std::env::split_paths(existing));
        }
        std::env::join_paths(all).map_err(|e| Error::InvalidConfig {
            path: self.build_dir.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_build_dir() {
        let temp = TempDir::new().unwrap();
        assert_eq!(BuildStaging::discover(temp.path()).unwrap(), None);
    }

    #[test]
    fn test_build_dir_without_marker() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("build/pkg")).unwrap();
        assert_eq!(BuildStaging::discover(temp.path()).unwrap(), None);
    }

    #[test]
    fn test_discovers_dirs_and_src() {
        let temp = TempDir::new().unwrap();
        let build = temp.path().join("build");
        fs::create_dir_all(build.join("alpha/src")).unwrap();
        fs::create_dir_all(build.join("beta")).unwrap();
        fs::write(build.join(PIP_MARKER), "").unwrap();

        let staging = BuildStaging::discover(temp.path()).unwrap().unwrap();
        assert_eq!(
            staging.paths(),
            [build.join("alpha"), build.join("alpha/src"), build.join("beta")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_pythonpath_prepends() {
        let temp = TempDir::new().unwrap();
        let build = temp.path().join("build");
        fs::create_dir_all(build.join("pkg")).unwrap();
        fs::write(build.join(PIP_MARKER), "").unwrap();

        let staging = BuildStaging::discover(temp.path()).unwrap().unwrap();
        let value = staging.pythonpath(Some(OsStr::new("/existing"))).unwrap();
        assert_eq!(value, OsString::from(format!("{}:/existing", build.join("pkg").display())));
    }
}
