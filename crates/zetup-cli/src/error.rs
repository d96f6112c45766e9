//! Error types for zetup-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can reach `main`
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Meta(#[from] zetup_meta::Error),

    #[error(transparent)]
    Commands(#[from] zetup_commands::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
