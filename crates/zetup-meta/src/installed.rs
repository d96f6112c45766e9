//! Index of installed distributions.
//!
//! [`SitePackages`] reads the metadata that installers leave next to the
//! packages they install: `*.dist-info/METADATA` for wheels and
//! `*.egg-info/PKG-INFO` (directory or file) for older installs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::requirement::canonical_key;
use crate::version::Version;

/// One installed distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledDistribution {
    pub project_name: String,
    pub version: Version,
    /// Directory that contains the distribution (the site directory).
    pub location: PathBuf,
}

/// Looks up installed distributions by name.
pub trait InstalledIndex {
    fn find(&self, name: &str) -> Result<Option<InstalledDistribution>>;
}

/// Metadata scan over a list of site directories, first hit wins.
#[derive(Debug, Clone, Default)]
pub struct SitePackages {
    dirs: Vec<PathBuf>,
}

impl SitePackages {
    pub fn new(dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn scan(&self, dir: &Path, key: &str) -> Result<Option<InstalledDistribution>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %dir.display(), "Site directory does not exist");
                return Ok(None);
            }
            Err(e) => return Err(Error::io(dir, e)),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();

        for path in paths {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let metadata = if file_name.ends_with(".dist-info") {
                path.join("METADATA")
            } else if file_name.ends_with(".egg-info") {
                if path.is_dir() { path.join("PKG-INFO") } else { path.clone() }
            } else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            let content = fs::read_to_string(&metadata).map_err(|e| Error::io(&metadata, e))?;
            let Some((name, version)) = parse_metadata(&content) else {
                tracing::debug!(path = %metadata.display(), "Skipping metadata without Name/Version");
                continue;
            };
            if canonical_key(&name) == key {
                return Ok(Some(InstalledDistribution {
                    project_name: name,
                    version: Version::new(version),
                    location: dir.to_path_buf(),
                }));
            }
        }
        Ok(None)
    }
}

impl InstalledIndex for SitePackages {
    fn find(&self, name: &str) -> Result<Option<InstalledDistribution>> {
        let key = canonical_key(name);
        for dir in &self.dirs {
            if let Some(found) = self.scan(dir, &key)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

/// `Name` and `Version` from the RFC 822 style header block.
fn parse_metadata(content: &str) -> Option<(String, String)> {
    let mut name = None;
    let mut version = None;
    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Name:") {
            name.get_or_insert_with(|| value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Version:") {
            version.get_or_insert_with(|| value.trim().to_string());
        }
    }
    Some((name?, version?))
}
