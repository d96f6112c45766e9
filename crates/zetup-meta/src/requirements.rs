//! Ordered requirement collections.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::probe::{ModuleProbe, ModuleVersionLookup, Strictness};
use crate::requirement::Requirement;
use crate::version::Version;

/// Requirements in source order, unique by canonical key.
///
/// A key that appears again replaces the earlier requirement in place, so
/// the set keeps the position of the first mention and the clauses and hint
/// of the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    requirements: Vec<Requirement>,
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a block of requirement lines. Blank lines are skipped.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut set = Self::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            set.push(Requirement::parse(line)?);
        }
        Ok(set)
    }

    /// Add a requirement, replacing any existing one with the same key.
    pub fn push(&mut self, requirement: Requirement) {
        match self.requirements.iter_mut().find(|r| r.key() == requirement.key()) {
            Some(existing) => {
                tracing::debug!(key = requirement.key(), "Requirement redeclared, keeping the later one");
                *existing = requirement;
            }
            None => self.requirements.push(requirement),
        }
    }

    /// One `requirement # import_name` line per entry.
    ///
    /// `RequirementSet::from_text(&set.serialize())` gives back an equal set.
    pub fn serialize(&self) -> String {
        self.requirements
            .iter()
            .map(Requirement::to_hinted_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A new set made of this one's serialized lines followed by `more`.
    ///
    /// Hints are written out explicitly, so customized import names survive.
    pub fn combine(&self, more: &str) -> Result<Self> {
        let text = format!("{}\n{more}", self.serialize());
        Self::from_text(&text)
    }

    /// Find a requirement by canonical key or by the name as written.
    pub fn lookup(&self, name: &str) -> Result<&Requirement> {
        self.get(name).ok_or_else(|| Error::UnknownRequirement {
            name: name.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.requirements
            .iter()
            .find(|r| r.key() == name || r.unsafe_name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Requirement> {
        self.requirements
            .iter_mut()
            .find(|r| r.key() == name || r.unsafe_name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
        self.requirements.iter()
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Plain requirement strings, without hints.
    pub fn install_requires(&self) -> Vec<String> {
        self.requirements.iter().map(Requirement::to_string).collect()
    }

    /// Check every requirement against what `modules` reports, in order.
    ///
    /// Stops at the first failure. With [`Strictness::Strict`] a missing module
    /// is [`Error::DistributionNotFound`] and a bad version is
    /// [`Error::VersionConflict`]; with [`Strictness::Lenient`] both give
    /// `Ok(false)`. A module without `__version__` is always an error.
    pub fn verify_all(&self, modules: &dyn ModuleVersionLookup, strictness: Strictness) -> Result<bool> {
        for requirement in &self.requirements {
            let module = requirement.import_name();
            match modules.module_version(module)? {
                ModuleProbe::NotImportable => {
                    tracing::debug!(module, "Required module is not importable");
                    if strictness.is_strict() {
                        return Err(Error::DistributionNotFound {
                            requirement: requirement.to_string(),
                        });
                    }
                    return Ok(false);
                }
                ModuleProbe::NoVersionAttribute => {
                    return Err(Error::MissingVersionAttribute {
                        module: module.to_string(),
                    });
                }
                ModuleProbe::Found(found) => {
                    if !requirement.contains(&Version::new(found.as_str())) {
                        tracing::debug!(module, found = %found, "Installed version does not satisfy requirement");
                        if strictness.is_strict() {
                            return Err(Error::VersionConflict {
                                subject: requirement.key().to_string(),
                                expected: requirement.to_string(),
                                found,
                            });
                        }
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }
}

impl fmt::Display for RequirementSet {
    /// Plain lines, no hints.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.install_requires().join("\n"))
    }
}

impl FromStr for RequirementSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

impl<'a> IntoIterator for &'a RequirementSet {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.requirements.iter()
    }
}
