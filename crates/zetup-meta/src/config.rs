//! Project configuration loading.
//!
//! A project directory holds a TOML description (`zetup.toml`, `zetup.cfg`
//! or `zetuprc`, first one found wins), a `VERSION` file, an optional
//! `requirements.txt` and any number of `requirements.<extra>.txt` files.
//! [`Project::load`] reads all of it and derives the values the packaging
//! toolchain needs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::extras::{self, ExtrasRegistry};
use crate::requirements::RequirementSet;
use crate::version::Version;

/// Config file names, in lookup order.
pub const CONFIG_FILENAMES: [&str; 3] = ["zetup.toml", "zetup.cfg", "zetuprc"];
pub const VERSION_FILENAME: &str = "VERSION";
pub const REQUIREMENTS_FILENAME: &str = "requirements.txt";
pub const NOTEBOOK_FILENAME: &str = "README.ipynb";

static AUTHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^<]+)<([^>]+)>$").unwrap());

/// On-disk config file layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub package: PackageSection,
    #[serde(default)]
    pub commands: CommandsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSection {
    /// Distribution name
    pub name: String,
    pub title: Option<String>,
    pub description: String,
    /// `Full Name <email>`
    pub author: String,
    pub url: String,
    pub license: String,
    #[serde(default)]
    pub python: Vec<String>,
    /// Import package, defaults to the distribution name
    pub package: Option<String>,
    #[serde(default)]
    pub classifiers: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandsSection {
    /// Executables that may be run as commands
    #[serde(default)]
    pub external: Vec<String>,
}

/// A fully loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub name: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: String,
    pub url: String,
    pub license: String,
    pub python: Vec<String>,
    pub package: String,
    pub classifiers: Vec<String>,
    pub keywords: Vec<String>,
    pub version: Version,
    pub distribution: Distribution,
    pub requires: RequirementSet,
    pub extras: ExtrasRegistry,
    /// Files shipped as package data, relative to `root`
    pub data_files: Vec<String>,
    pub notebook: Option<PathBuf>,
    pub external_commands: Vec<String>,
}

impl Project {
    /// First existing config file in `dir`.
    pub fn find_config(dir: &Path) -> Result<PathBuf> {
        CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| Error::ConfigNotFound { dir: dir.to_path_buf() })
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = Self::find_config(dir)?;
        tracing::debug!(path = %config_path.display(), "Using zetup config");

        let content = read_text(&config_path)?;
        let config: ConfigFile = toml::from_str(&content).map_err(|e| Error::InvalidConfig {
            path: config_path.clone(),
            message: e.to_string(),
        })?;
        let package = config.package;

        let (author, email) = split_author(&package.author).ok_or_else(|| Error::InvalidConfig {
            path: config_path.clone(),
            message: format!("author must look like 'Name <email>', got '{}'", package.author),
        })?;

        let mut classifiers = package.classifiers.clone();
        classifiers.push("Programming Language :: Python".to_string());
        for python in &package.python {
            classifiers.push(format!("Programming Language :: Python :: {python}"));
        }

        let mut keywords = package.keywords.clone();
        if package.python.iter().any(|v| v.starts_with('3')) {
            keywords.push("python3".to_string());
        }

        let config_name = config_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut data_files = vec![
            config_name,
            VERSION_FILENAME.to_string(),
            REQUIREMENTS_FILENAME.to_string(),
        ];

        let version = Version::new(read_text(&dir.join(VERSION_FILENAME))?.trim());
        let import_package = package.package.clone().unwrap_or_else(|| package.name.clone());
        let distribution = Distribution::new(&package.name, version.clone()).with_owner(&import_package);

        let requirements_path = dir.join(REQUIREMENTS_FILENAME);
        let requires = if requirements_path.is_file() {
            RequirementSet::from_text(&read_text(&requirements_path)?)?
        } else {
            RequirementSet::new()
        };

        let mut extras = ExtrasRegistry::new();
        for (name, path) in extras::discover(dir)? {
            tracing::debug!(extra = %name, path = %path.display(), "Found extra requirements");
            extras.set(&name, &read_text(&path)?)?;
            if let Some(file_name) = path.file_name() {
                data_files.push(file_name.to_string_lossy().into_owned());
            }
        }

        let notebook_path = dir.join(NOTEBOOK_FILENAME);
        let notebook = if notebook_path.exists() {
            data_files.push(NOTEBOOK_FILENAME.to_string());
            Some(notebook_path)
        } else {
            None
        };

        Ok(Self {
            root: dir.to_path_buf(),
            config_path,
            title: package.title.clone().unwrap_or_else(|| package.name.clone()),
            description: package.description.trim().replace('\n', " "),
            author,
            email,
            url: package.url,
            license: package.license,
            python: package.python,
            package: import_package,
            classifiers,
            keywords,
            version,
            distribution,
            requires,
            extras,
            data_files,
            notebook,
            external_commands: config.commands.external,
            name: package.name,
        })
    }

    /// Keyword arguments for the packaging toolchain's `setup()`.
    pub fn setup_keywords(&self) -> SetupKeywords {
        SetupKeywords {
            name: self.name.clone(),
            version: self.version.to_string(),
            description: self.description.clone(),
            author: self.author.clone(),
            author_email: self.email.clone(),
            url: self.url.clone(),
            license: self.license.clone(),
            install_requires: self.requires.install_requires(),
            extras_require: ExtrasRequire(self.extras.extras_require()),
            classifiers: self.classifiers.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

/// Setup keyword map, serialized in this field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupKeywords {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub author_email: String,
    pub url: String,
    pub license: String,
    pub install_requires: Vec<String>,
    pub extras_require: ExtrasRequire,
    pub classifiers: Vec<String>,
    pub keywords: Vec<String>,
}

/// Extras in registry order; serializes as a map.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrasRequire(pub Vec<(String, Vec<String>)>);

impl Serialize for ExtrasRequire {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, requirements) in &self.0 {
            map.serialize_entry(name, requirements)?;
        }
        map.end()
    }
}

fn split_author(author: &str) -> Option<(String, String)> {
    let caps = AUTHOR_PATTERN.captures(author.trim())?;
    Some((caps[1].trim().to_string(), caps[2].trim().to_string()))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_author() {
        assert_eq!(
            split_author("Stefan Zimmermann <zimmermann.code@gmail.com>"),
            Some(("Stefan Zimmermann".into(), "zimmermann.code@gmail.com".into()))
        );
        assert_eq!(split_author("nobody"), None);
    }

    #[test]
    fn test_extras_require_keeps_order() {
        let extras = ExtrasRequire(vec![
            ("test".into(), vec!["pytest".into()]),
            ("doc".into(), vec![]),
        ]);
        assert_eq!(
            serde_json::to_string(&extras).unwrap(),
            r#"{"test":["pytest"],"doc":[]}"#
        );
    }
}
