//! The package's own distribution identity.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::installed::{InstalledDistribution, InstalledIndex};
use crate::probe::Strictness;
use crate::version::Version;

/// A distribution name together with the version it is expected to have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    name: String,
    version: Version,
    /// Package whose `__version__` the expected version came from.
    owner: String,
}

impl Distribution {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        let name = name.into();
        Self {
            owner: name.clone(),
            name,
            version,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Look the distribution up by name.
    pub fn locate(&self, index: &dyn InstalledIndex) -> Result<Option<InstalledDistribution>> {
        index.find(&self.name)
    }

    /// Locate the distribution and confirm it is the one `module_path` was
    /// loaded from.
    ///
    /// Returns `None` when nothing is installed under the name, or when the
    /// installed copy lives somewhere other than the parent of
    /// `module_path`. A version mismatch is [`Error::VersionConflict`] under
    /// [`Strictness::Strict`] and `None` otherwise.
    pub fn verify(
        &self,
        index: &dyn InstalledIndex,
        module_path: &Path,
        strictness: Strictness,
    ) -> Result<Option<InstalledDistribution>> {
        let Some(installed) = self.locate(index)? else {
            tracing::debug!(name = %self.name, "Distribution is not installed");
            return Ok(None);
        };

        let expected_location = module_path.parent().unwrap_or(module_path);
        if real_path(&installed.location) != real_path(expected_location) {
            tracing::debug!(
                name = %self.name,
                installed = %installed.location.display(),
                expected = %expected_location.display(),
                "Installed distribution belongs to another location"
            );
            return Ok(None);
        }

        if installed.version != self.version {
            if strictness.is_strict() {
                return Err(Error::VersionConflict {
                    subject: format!("distribution {}", installed.project_name),
                    expected: format!("{} (version of package {})", self.version, self.owner),
                    found: installed.version.to_string(),
                });
            }
            return Ok(None);
        }

        Ok(Some(installed))
    }
}

fn real_path(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
