//! [`TestProject`] builder for zetup project directories.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Minimal valid `zetup.toml` for a package called `demo`.
pub const DEFAULT_CONFIG: &str = r#"[package]
name = "demo"
description = """
A demo package
for tests.
"""
author = "Jane Doe <jane@example.com>"
url = "https://example.com/demo"
license = "MIT"
python = ["2.7", "3.4"]
classifiers = ["Development Status :: 3 - Alpha"]
keywords = ["demo", "testing"]
"#;

/// A temporary project directory with helpers for setup and assertions.
///
/// # Example
///
/// ```rust,no_run
/// use zetup_test_utils::project::TestProject;
///
/// let project = TestProject::new()
///     .with_default_config()
///     .with_version("1.0")
///     .with_requirements("six>=1.0\n");
/// project.assert_file_exists("zetup.toml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// `zetup.toml` + `VERSION` 1.0, nothing else.
    pub fn minimal() -> Self {
        Self::new().with_default_config().with_version("1.0")
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write an arbitrary file relative to the root, creating parent dirs.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", full_path.display()));
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write(path, content);
        self
    }

    pub fn with_config(self, content: &str) -> Self {
        self.with_file("zetup.toml", content)
    }

    pub fn with_default_config(self) -> Self {
        self.with_config(DEFAULT_CONFIG)
    }

    /// Default config plus a `[commands]` allow-list.
    pub fn with_external_commands(self, commands: &[&str]) -> Self {
        let list = commands
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        self.with_config(&format!("{DEFAULT_CONFIG}\n[commands]\nexternal = [{list}]\n"))
    }

    pub fn with_version(self, version: &str) -> Self {
        self.with_file("VERSION", &format!("{version}\n"))
    }

    pub fn with_requirements(self, text: &str) -> Self {
        self.with_file("requirements.txt", text)
    }

    /// Write `requirements.<name>.txt`.
    pub fn with_extra(self, name: &str, text: &str) -> Self {
        self.with_file(&format!("requirements.{name}.txt"), text)
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
