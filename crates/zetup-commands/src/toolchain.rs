//! The underlying packaging toolchain.

use std::rc::Rc;

use crate::error::Result;
use crate::process::ProcessSpawner;

/// Commands understood by `setup.py` (setuptools and distutils).
pub const SETUPTOOLS_COMMANDS: &[&str] = &[
    "build",
    "build_py",
    "build_ext",
    "build_clib",
    "build_scripts",
    "clean",
    "install",
    "install_lib",
    "install_headers",
    "install_scripts",
    "install_data",
    "sdist",
    "register",
    "bdist",
    "bdist_dumb",
    "bdist_rpm",
    "bdist_wininst",
    "bdist_egg",
    "bdist_wheel",
    "check",
    "upload",
    "develop",
    "egg_info",
    "test",
];

/// Runs standard packaging commands.
pub trait Toolchain {
    fn commands(&self) -> Vec<String>;

    /// Run `command`, returning its exit status.
    fn run(&self, command: &str) -> Result<i32>;
}

/// `python setup.py <command>` in the project directory.
pub struct SetupPy {
    python: String,
    spawner: Rc<dyn ProcessSpawner>,
}

impl SetupPy {
    pub fn new(python: impl Into<String>, spawner: Rc<dyn ProcessSpawner>) -> Self {
        Self {
            python: python.into(),
            spawner,
        }
    }
}

impl Toolchain for SetupPy {
    fn commands(&self) -> Vec<String> {
        SETUPTOOLS_COMMANDS.iter().map(|c| c.to_string()).collect()
    }

    fn run(&self, command: &str) -> Result<i32> {
        tracing::debug!(python = %self.python, command, "Delegating to setup.py");
        self.spawner.spawn(&self.python, &["setup.py", command])
    }
}
