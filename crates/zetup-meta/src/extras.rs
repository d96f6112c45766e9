//! Named optional requirement bundles.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::requirements::RequirementSet;

static EXTRAS_FILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^requirements\.(?P<name>[^.]+)\.txt$").unwrap());

/// Extra name → requirement set, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtrasRegistry {
    entries: Vec<(String, RequirementSet)>,
}

impl ExtrasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and store it under `name`.
    ///
    /// An existing entry is replaced without moving. On a parse error the
    /// registry is left unchanged.
    pub fn set(&mut self, name: &str, text: &str) -> Result<()> {
        let requirements = RequirementSet::from_text(text)?;
        self.insert(name, requirements);
        Ok(())
    }

    pub fn insert(&mut self, name: &str, requirements: RequirementSet) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = requirements,
            None => self.entries.push((name.to_string(), requirements)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RequirementSet> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn remove(&mut self, name: &str) -> Option<RequirementSet> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RequirementSet)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `[name]` header plus serialized lines per extra, blank line between.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(name, requirements)| format!("[{name}]\n{}", requirements.serialize()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Name → plain requirement strings, for packaging metadata.
    pub fn extras_require(&self) -> Vec<(String, Vec<String>)> {
        self.entries
            .iter()
            .map(|(name, requirements)| (name.clone(), requirements.install_requires()))
            .collect()
    }
}

impl fmt::Display for ExtrasRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// `requirements.<extra>.txt` files in `dir`, sorted by file name.
pub fn discover(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if let Some(caps) = EXTRAS_FILE_PATTERN.captures(file_name) {
            found.push((caps["name"].to_string(), entry.path()));
        }
    }
    found.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_bad_text_without_changes() {
        let mut extras = ExtrasRegistry::new();
        extras.set("dev", "pytest").unwrap();
        assert!(extras.set("dev", "pytest >=").is_err());
        assert_eq!(extras.get("dev").unwrap().len(), 1);
    }

    #[test]
    fn test_remove_then_reinsert_moves_to_end() {
        let mut extras = ExtrasRegistry::new();
        extras.set("a", "x").unwrap();
        extras.set("b", "y").unwrap();
        extras.remove("a").unwrap();
        extras.set("a", "z").unwrap();
        assert_eq!(extras.names().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn test_file_pattern() {
        assert!(EXTRAS_FILE_PATTERN.is_match("requirements.dev.txt"));
        assert!(!EXTRAS_FILE_PATTERN.is_match("requirements.txt"));
        assert!(!EXTRAS_FILE_PATTERN.is_match("requirements.a.b.txt"));
    }
}
