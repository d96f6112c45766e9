//! Environment probes used during verification.
//!
//! Verification never imports anything itself. It asks a
//! [`ModuleVersionLookup`] what version a module reports, which lets tests
//! swap the real interpreter for [`StaticModules`].

use std::collections::HashMap;

use crate::error::Result;

/// How a verification failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Failures are returned as errors.
    #[default]
    Strict,
    /// Failures turn into `false` / `None`.
    Lenient,
}

impl Strictness {
    pub fn is_strict(self) -> bool {
        self == Strictness::Strict
    }
}

/// What a probe found out about one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleProbe {
    /// Importable, and reports this `__version__`.
    Found(String),
    NotImportable,
    /// Importable but without a `__version__` attribute.
    NoVersionAttribute,
}

/// Answers "which version does module X report?".
///
/// `Err` means the probe itself broke (missing interpreter, crash), not that
/// the module is absent.
pub trait ModuleVersionLookup {
    fn module_version(&self, module: &str) -> Result<ModuleProbe>;
}

/// Fixed module table.
#[derive(Debug, Clone, Default)]
pub struct StaticModules {
    modules: HashMap<String, Option<String>>,
}

impl StaticModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.modules.insert(name.into(), Some(version.into()));
        self
    }

    pub fn with_unversioned(mut self, name: impl Into<String>) -> Self {
        self.modules.insert(name.into(), None);
        self
    }

    pub fn remove(&mut self, name: &str) {
        self.modules.remove(name);
    }
}

impl ModuleVersionLookup for StaticModules {
    fn module_version(&self, module: &str) -> Result<ModuleProbe> {
        Ok(match self.modules.get(module) {
            Some(Some(version)) => ModuleProbe::Found(version.clone()),
            Some(None) => ModuleProbe::NoVersionAttribute,
            None => ModuleProbe::NotImportable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_modules() {
        let modules = StaticModules::new()
            .with_module("yaml", "5.1")
            .with_unversioned("legacy");

        assert_eq!(modules.module_version("yaml").unwrap(), ModuleProbe::Found("5.1".into()));
        assert_eq!(modules.module_version("legacy").unwrap(), ModuleProbe::NoVersionAttribute);
        assert_eq!(modules.module_version("missing").unwrap(), ModuleProbe::NotImportable);
    }
}
