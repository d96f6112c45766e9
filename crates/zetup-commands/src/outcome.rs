//! Normalized command results.

/// What a command handler returns on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report; exit status 0.
    Done,
    /// An explicit exit status.
    Status { code: i32 },
    /// A human-readable message plus exit status.
    Rich { message: String, code: i32 },
}

impl Outcome {
    /// Successful outcome carrying a message.
    pub fn message(message: impl Into<String>) -> Self {
        Outcome::Rich {
            message: message.into(),
            code: 0,
        }
    }

    /// The exit status this outcome maps to.
    pub fn code(&self) -> i32 {
        match self {
            Outcome::Done => 0,
            Outcome::Status { code } | Outcome::Rich { code, .. } => *code,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Rich { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<i32> for Outcome {
    fn from(code: i32) -> Self {
        Outcome::Status { code }
    }
}
