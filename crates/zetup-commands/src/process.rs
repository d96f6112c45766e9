//! Spawning external processes.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};

/// Exit status reported for a process killed by a signal
pub const SIGNALED_STATUS: i32 = 1;

/// Runs one process to completion and reports its exit code.
pub trait ProcessSpawner {
    fn spawn(&self, program: &str, args: &[&str]) -> Result<i32>;
}

/// Spawns real processes with inherited stdio.
#[derive(Debug, Clone)]
pub struct SystemSpawner {
    cwd: PathBuf,
    env: Vec<(OsString, OsString)>,
}

impl SystemSpawner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, program: &str, args: &[&str]) -> Result<i32> {
        tracing::info!(program, ?args, cwd = %self.cwd.display(), "Spawning process");
        let status = Command::new(program)
            .args(args)
            .current_dir(&self.cwd)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .status()
            .map_err(|source| Error::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(match status.code() {
            Some(code) => code,
            None => {
                tracing::warn!(program, "Process terminated by signal");
                SIGNALED_STATUS
            }
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zetup_test_utils::script::write_script;

    #[test]
    fn test_exit_code_is_reported() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "seven", "exit 7");
        let spawner = SystemSpawner::new(temp.path());

        assert_eq!(spawner.spawn(script.to_str().unwrap(), &[]).unwrap(), 7);
    }

    #[test]
    fn test_cwd_and_env() {
        let temp = TempDir::new().unwrap();
        let script = write_script(
            temp.path(),
            "check",
            r#"[ "$ZETUP_TEST" = "yes" ] && [ -f marker ] || exit 9"#,
        );
        std::fs::write(temp.path().join("marker"), "").unwrap();
        let spawner = SystemSpawner::new(temp.path()).with_env("ZETUP_TEST", "yes");

        assert_eq!(spawner.spawn(script.to_str().unwrap(), &[]).unwrap(), 0);
    }

    #[test]
    fn test_missing_program() {
        let temp = TempDir::new().unwrap();
        let spawner = SystemSpawner::new(temp.path());
        assert!(matches!(
            spawner.spawn("zetup-no-such-program", &[]),
            Err(Error::Spawn { .. })
        ));
    }
}
