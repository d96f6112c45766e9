//! Command dispatch for zetup.
//!
//! A [`CommandResolver`] searches four ranked namespaces for a command
//! token: library operations, commands bound to the loaded project, the
//! packaging toolchain's commands, and an allow-list of external programs.

pub mod builtins;
pub mod error;
pub mod namespace;
pub mod outcome;
pub mod process;
pub mod resolver;
pub mod toolchain;

pub use builtins::{INSTANCE_COMMANDS, LIBRARY_COMMANDS, instance_commands, is_static_command, library_commands};
pub use error::{CommandError, Error, Result};
pub use namespace::{CommandNamespace, CommandTable, ExternalCommands, Handler, NamespaceKind, ToolchainCommands};
pub use outcome::Outcome;
pub use process::{ProcessSpawner, SystemSpawner};
pub use resolver::{CommandResolver, EXIT_FAILURE};
pub use toolchain::{SETUPTOOLS_COMMANDS, SetupPy, Toolchain};
