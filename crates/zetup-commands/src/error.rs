//! Error types for zetup-commands

pub type Result<T> = std::result::Result<T, Error>;

/// Expected, user-facing failure raised by a library or instance command.
///
/// Caught by the dispatcher, printed as `Error: <message>` and turned into
/// a generic failure status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token is not in any namespace
    #[error("Unknown command: {command}")]
    UnknownCommand { command: String },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Meta(#[from] zetup_meta::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
