//! Command namespaces.
//!
//! Each namespace is one source of command names. The resolver asks them in
//! rank order and takes the first handler offered.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::outcome::Outcome;
use crate::process::ProcessSpawner;
use crate::toolchain::Toolchain;

/// A resolved command, ready to run once.
pub type Handler<'a> = Box<dyn FnOnce() -> Result<Outcome> + 'a>;

/// A bound command in a [`CommandTable`].
pub type BoundCommand = Box<dyn Fn() -> Result<Outcome>>;

/// Where a command comes from. Lower rank wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamespaceKind {
    /// Operations provided by zetup itself
    Library,
    /// Commands bound to the loaded project
    Instance,
    /// Commands of the packaging toolchain
    Toolchain,
    /// Allow-listed external executables
    External,
}

impl NamespaceKind {
    pub fn rank(self) -> u8 {
        match self {
            NamespaceKind::Library => 1,
            NamespaceKind::Instance => 2,
            NamespaceKind::Toolchain => 3,
            NamespaceKind::External => 4,
        }
    }

    /// Whether `CommandError`s from this namespace are caught at dispatch.
    pub fn catches_command_errors(self) -> bool {
        matches!(self, NamespaceKind::Library | NamespaceKind::Instance)
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceKind::Library => write!(f, "library"),
            NamespaceKind::Instance => write!(f, "instance"),
            NamespaceKind::Toolchain => write!(f, "toolchain"),
            NamespaceKind::External => write!(f, "external"),
        }
    }
}

/// One searchable source of commands.
pub trait CommandNamespace {
    fn kind(&self) -> NamespaceKind;

    /// A handler for `token`, or `None` if this namespace does not know it.
    fn try_resolve(&self, token: &str) -> Option<Handler<'_>>;

    /// Every name this namespace answers to.
    fn names(&self) -> Vec<String>;
}

/// Named closures, in registration order.
pub struct CommandTable {
    kind: NamespaceKind,
    commands: Vec<(String, BoundCommand)>,
}

impl CommandTable {
    pub fn new(kind: NamespaceKind) -> Self {
        Self {
            kind,
            commands: Vec::new(),
        }
    }

    /// Register `name`, replacing an earlier registration.
    pub fn register<F>(&mut self, name: &str, command: F) -> &mut Self
    where
        F: Fn() -> Result<Outcome> + 'static,
    {
        let command: BoundCommand = Box::new(command);
        match self.commands.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = command,
            None => self.commands.push((name.to_string(), command)),
        }
        self
    }

    pub fn with<F>(mut self, name: &str, command: F) -> Self
    where
        F: Fn() -> Result<Outcome> + 'static,
    {
        self.register(name, command);
        self
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("kind", &self.kind)
            .field("commands", &self.names())
            .finish()
    }
}

impl CommandNamespace for CommandTable {
    fn kind(&self) -> NamespaceKind {
        self.kind
    }

    fn try_resolve(&self, token: &str) -> Option<Handler<'_>> {
        let (_, command) = self.commands.iter().find(|(name, _)| name == token)?;
        Some(Box::new(move || command()))
    }

    fn names(&self) -> Vec<String> {
        self.commands.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// Commands delegated to a [`Toolchain`].
pub struct ToolchainCommands {
    toolchain: Box<dyn Toolchain>,
}

impl ToolchainCommands {
    pub fn new(toolchain: impl Toolchain + 'static) -> Self {
        Self {
            toolchain: Box::new(toolchain),
        }
    }
}

impl CommandNamespace for ToolchainCommands {
    fn kind(&self) -> NamespaceKind {
        NamespaceKind::Toolchain
    }

    fn try_resolve(&self, token: &str) -> Option<Handler<'_>> {
        if !self.toolchain.commands().iter().any(|c| c == token) {
            return None;
        }
        let token = token.to_string();
        Some(Box::new(move || Ok(Outcome::from(self.toolchain.run(&token)?))))
    }

    fn names(&self) -> Vec<String> {
        self.toolchain.commands()
    }
}

/// Allow-listed executables, spawned without arguments.
pub struct ExternalCommands {
    allowed: Vec<String>,
    spawner: Rc<dyn ProcessSpawner>,
}

impl ExternalCommands {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>, spawner: Rc<dyn ProcessSpawner>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            spawner,
        }
    }
}

impl CommandNamespace for ExternalCommands {
    fn kind(&self) -> NamespaceKind {
        NamespaceKind::External
    }

    fn try_resolve(&self, token: &str) -> Option<Handler<'_>> {
        let program = self.allowed.iter().find(|name| *name == token)?;
        Some(Box::new(move || Ok(Outcome::from(self.spawner.spawn(program, &[])?))))
    }

    fn names(&self) -> Vec<String> {
        self.allowed.clone()
    }
}
