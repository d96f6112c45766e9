//! Command resolution and dispatch.
//!
//! The resolver holds an ordered list of [`CommandNamespace`]s. A token is
//! resolved by the first namespace (lowest rank) that knows it; dispatch
//! runs the handler and turns its result into an exit status.

use std::io::Write;

use crate::error::{Error, Result};
use crate::namespace::{CommandNamespace, Handler, NamespaceKind};

/// Exit status for a caught [`CommandError`](crate::CommandError)
pub const EXIT_FAILURE: i32 = 1;

/// Looks up command tokens across namespaces in rank order.
#[derive(Default)]
pub struct CommandResolver {
    namespaces: Vec<Box<dyn CommandNamespace>>,
}

impl CommandResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace. Namespaces stay sorted by rank; equal ranks keep
    /// insertion order.
    pub fn add(&mut self, namespace: impl CommandNamespace + 'static) -> &mut Self {
        self.namespaces.push(Box::new(namespace));
        self.namespaces.sort_by_key(|ns| ns.kind().rank());
        self
    }

    pub fn with(mut self, namespace: impl CommandNamespace + 'static) -> Self {
        self.add(namespace);
        self
    }

    /// The first handler for `token`, with the namespace it came from.
    pub fn resolve(&self, token: &str) -> Result<(NamespaceKind, Handler<'_>)> {
        for namespace in &self.namespaces {
            if let Some(handler) = namespace.try_resolve(token) {
                tracing::debug!(token, namespace = %namespace.kind(), "Resolved command");
                return Ok((namespace.kind(), handler));
            }
        }
        Err(Error::UnknownCommand {
            command: token.to_string(),
        })
    }

    /// Resolve and run `token`, returning the exit status.
    ///
    /// Rich messages go to `out`. A [`CommandError`](crate::CommandError)
    /// from a library or instance command is written to `err` as
    /// `Error: <message>` and gives [`EXIT_FAILURE`]. Every other error is
    /// returned.
    pub fn dispatch(&self, token: &str, out: &mut dyn Write, err: &mut dyn Write) -> Result<i32> {
        let (kind, handler) = self.resolve(token)?;
        match handler() {
            Ok(outcome) => {
                if let Some(message) = outcome.text().filter(|m| !m.is_empty()) {
                    writeln!(out, "{message}")?;
                }
                Ok(outcome.code())
            }
            Err(Error::Command(e)) if kind.catches_command_errors() => {
                tracing::debug!(token, error = %e, "Command failed");
                writeln!(err, "Error: {e}")?;
                Ok(EXIT_FAILURE)
            }
            Err(e) => Err(e),
        }
    }

    /// All known command names, highest precedence first, no duplicates.
    pub fn vocabulary(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for namespace in &self.namespaces {
            for name in namespace.names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn contains(&self, token: &str) -> bool {
        self.namespaces
            .iter()
            .any(|ns| ns.names().iter().any(|name| name == token))
    }
}
