//! Probing a real Python interpreter.
//!
//! Each probe is one short-lived `python -c <script>` process. The scripts
//! signal their verdict through the exit code. The answer itself travels on
//! a [`REPLY_MARKER`] line; while the module is imported its stdout is
//! pointed at stderr, so import-time prints never leak into the answer.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{Error, Result};
use crate::installed::{InstalledDistribution, InstalledIndex, SitePackages};
use crate::probe::{ModuleProbe, ModuleVersionLookup};

/// Exit code of the version script when the import fails
const EXIT_NOT_IMPORTABLE: i32 = 3;
/// Exit code of the version script when `__version__` is missing
const EXIT_NO_VERSION: i32 = 4;

/// Prefix of the line carrying a script's answer. Anything else on stdout
/// is output of the imported module and is ignored.
pub const REPLY_MARKER: &str = "::zetup::";

const MODULE_VERSION_SCRIPT: &str = r#"
import importlib, sys
out, sys.stdout = sys.stdout, sys.stderr
try:
    module = importlib.import_module(sys.argv[1])
except ImportError:
    sys.exit(3)
try:
    version = module.__version__
except AttributeError:
    sys.exit(4)
out.write("\n::zetup::%s\n" % (version,))
out.flush()
"#;

const MODULE_PATH_SCRIPT: &str = r#"
import importlib, os, sys
out, sys.stdout = sys.stdout, sys.stderr
try:
    module = importlib.import_module(sys.argv[2])
except ImportError:
    sys.exit(3)
out.write("\n::zetup::%s\n" % os.path.dirname(os.path.abspath(module.__file__)))
out.flush()
"#;

const SITE_PACKAGES_SCRIPT: &str = r#"
import sysconfig
paths = sysconfig.get_paths()
print(paths["purelib"])
print(paths["platlib"])
"#;

/// A Python interpreter used as an environment probe.
#[derive(Debug, Clone)]
pub struct PythonInterpreter {
    program: PathBuf,
    env: Vec<(OsString, OsString)>,
}

impl PythonInterpreter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            env: Vec::new(),
        }
    }

    /// Extra environment variable for every probe process.
    pub fn with_env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, script: &str, args: &[&str]) -> Result<Output> {
        tracing::debug!(program = %self.program.display(), ?args, "Running interpreter probe");
        let mut cmd = Command::new(&self.program);
        cmd.arg("-c").arg(script).args(args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd.output().map_err(|e| self.probe_error(e.to_string()))
    }

    fn probe_error(&self, message: impl Into<String>) -> Error {
        Error::Probe {
            program: self.program.display().to_string(),
            message: message.into(),
        }
    }

    /// The value after the last [`REPLY_MARKER`] line on stdout.
    fn reply(&self, output: &Output) -> Result<String> {
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix(REPLY_MARKER))
            .map(|value| value.trim().to_string())
            .ok_or_else(|| self.probe_error("no reply on stdout"))
    }

    /// Site directories reported by the interpreter, deduplicated.
    pub fn site_packages(&self) -> Result<Vec<PathBuf>> {
        let output = self.run(SITE_PACKAGES_SCRIPT, &[])?;
        if !output.status.success() {
            return Err(self.probe_error(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }

        let mut dirs: Vec<PathBuf> = Vec::new();
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            let dir = PathBuf::from(line.trim());
            if !line.trim().is_empty() && !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        Ok(dirs)
    }

    /// Directory the module's file lives in, or `None` when it cannot be
    /// imported. For a package this is the package directory.
    pub fn module_path(&self, module: &str) -> Result<Option<PathBuf>> {
        let output = self.run(MODULE_PATH_SCRIPT, &["--path", module])?;
        match output.status.code() {
            Some(0) => Ok(Some(PathBuf::from(self.reply(&output)?))),
            Some(EXIT_NOT_IMPORTABLE) => Ok(None),
            _ => Err(self.probe_error(String::from_utf8_lossy(&output.stderr).trim().to_string())),
        }
    }
}

impl ModuleVersionLookup for PythonInterpreter {
    fn module_version(&self, module: &str) -> Result<ModuleProbe> {
        let output = self.run(MODULE_VERSION_SCRIPT, &[module])?;
        match output.status.code() {
            Some(0) => Ok(ModuleProbe::Found(self.reply(&output)?)),
            Some(EXIT_NOT_IMPORTABLE) => Ok(ModuleProbe::NotImportable),
            Some(EXIT_NO_VERSION) => Ok(ModuleProbe::NoVersionAttribute),
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                Err(self.probe_error(match code {
                    Some(code) => format!("exit code {code}: {stderr}"),
                    None => format!("terminated by signal: {stderr}"),
                }))
            }
        }
    }
}

impl InstalledIndex for PythonInterpreter {
    fn find(&self, name: &str) -> Result<Option<InstalledDistribution>> {
        SitePackages::new(self.site_packages()?).find(name)
    }
}
