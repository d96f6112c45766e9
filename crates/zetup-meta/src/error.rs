//! Error types for zetup-meta

use std::path::PathBuf;

/// Result type for zetup-meta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or verifying package metadata
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed requirement clause or version text
    #[error("Invalid requirement line '{line}': {reason}")]
    Parse { line: String, reason: String },

    /// A required module cannot be imported, or a distribution is not installed
    #[error("Distribution not found: {requirement}")]
    DistributionNotFound { requirement: String },

    /// Installed version does not satisfy a constraint
    #[error("Version conflict for {subject}: need {expected}, found {found}")]
    VersionConflict {
        subject: String,
        expected: String,
        found: String,
    },

    /// The imported module exposes no version attribute.
    ///
    /// This means the requirement metadata itself is broken, so it is never
    /// downgraded to a boolean verification failure.
    #[error("Module '{module}' has no __version__ attribute")]
    MissingVersionAttribute { module: String },

    /// Requirement lookup by name failed
    #[error("Unknown requirement: {name}")]
    UnknownRequirement { name: String },

    #[error("No zetup config found in {dir}")]
    ConfigNotFound { dir: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The environment probe itself failed (interpreter missing, crashed, ...)
    #[error("Probe '{program}' failed: {message}")]
    Probe { program: String, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a verification verdict (as opposed to a
    /// configuration or machinery failure).
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Error::DistributionNotFound { .. } | Error::VersionConflict { .. }
        )
    }
}
