//! Package metadata for zetup.
//!
//! This crate holds the typed model behind a zetup project: comparable
//! versions, requirement lines with import-name hints, requirement sets and
//! extras, the package's own distribution identity, and the environment
//! probes used to verify all of them against an installed Python
//! environment.

pub mod config;
pub mod distribution;
pub mod error;
pub mod extras;
pub mod installed;
pub mod interpreter;
pub mod probe;
pub mod requirement;
pub mod requirements;
pub mod specifier;
pub mod staging;
pub mod version;

pub use config::{ConfigFile, Project, SetupKeywords};
pub use distribution::Distribution;
pub use error::{Error, Result};
pub use extras::ExtrasRegistry;
pub use installed::{InstalledDistribution, InstalledIndex, SitePackages};
pub use interpreter::PythonInterpreter;
pub use probe::{ModuleProbe, ModuleVersionLookup, StaticModules, Strictness};
pub use requirement::{Requirement, canonical_key};
pub use requirements::RequirementSet;
pub use specifier::{Clause, Operator};
pub use staging::BuildStaging;
pub use version::Version;
