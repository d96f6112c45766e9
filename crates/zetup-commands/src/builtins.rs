//! Library and instance command sets for a loaded project.

use std::rc::Rc;

use zetup_meta::{Error as MetaError, Project, PythonInterpreter, Strictness};

use crate::error::{CommandError, Result};
use crate::namespace::{CommandTable, NamespaceKind};
use crate::outcome::Outcome;
use crate::toolchain::SETUPTOOLS_COMMANDS;

/// Names registered by [`library_commands`].
pub const LIBRARY_COMMANDS: &[&str] = &["verify", "metadata", "dist"];

/// Names registered by [`instance_commands`].
pub const INSTANCE_COMMANDS: &[&str] = &["requirements", "extras", "version", "classifiers", "keywords", "data"];

/// Whether `token` names a built-in or toolchain command. Answerable
/// without loading a project.
pub fn is_static_command(token: &str) -> bool {
    LIBRARY_COMMANDS
        .iter()
        .chain(INSTANCE_COMMANDS)
        .chain(SETUPTOOLS_COMMANDS)
        .any(|name| *name == token)
}

/// `verify`, `metadata` and `dist`.
pub fn library_commands(project: Rc<Project>, python: Rc<PythonInterpreter>) -> CommandTable {
    let verify_command = {
        let (project, python) = (Rc::clone(&project), Rc::clone(&python));
        move || verify(&project, &python)
    };
    let metadata_command = {
        let project = Rc::clone(&project);
        move || -> Result<Outcome> {
            let json = serde_json::to_string_pretty(&project.setup_keywords())?;
            Ok(Outcome::message(json))
        }
    };
    let dist_command = move || dist(&project, &python);

    CommandTable::new(NamespaceKind::Library)
        .with("verify", verify_command)
        .with("metadata", metadata_command)
        .with("dist", dist_command)
}

/// Read-only views of the project: `requirements`, `extras`, `version`,
/// `classifiers`, `keywords` and `data`.
pub fn instance_commands(project: Rc<Project>) -> CommandTable {
    let mut table = CommandTable::new(NamespaceKind::Instance);

    let p = Rc::clone(&project);
    table.register("requirements", move || Ok(Outcome::message(p.requires.serialize())));
    let p = Rc::clone(&project);
    table.register("extras", move || Ok(Outcome::message(p.extras.render())));
    let p = Rc::clone(&project);
    table.register("version", move || Ok(Outcome::message(p.version.to_string())));
    let p = Rc::clone(&project);
    table.register("classifiers", move || Ok(Outcome::message(p.classifiers.join("\n"))));
    let p = Rc::clone(&project);
    table.register("keywords", move || Ok(Outcome::message(p.keywords.join(" "))));
    let p = project;
    table.register("data", move || Ok(Outcome::message(p.data_files.join("\n"))));

    table
}

fn verify(project: &Project, python: &PythonInterpreter) -> Result<Outcome> {
    match project.requires.verify_all(python, Strictness::Strict) {
        Ok(_) => Ok(Outcome::message(format!(
            "All {} requirements of {} are satisfied",
            project.requires.len(),
            project.name
        ))),
        Err(e) if e.is_verification_failure() => Err(CommandError::new(e.to_string()).into()),
        Err(e) => Err(e.into()),
    }
}

fn dist(project: &Project, python: &PythonInterpreter) -> Result<Outcome> {
    let Some(module_path) = python.module_path(&project.package)? else {
        return Err(CommandError::new(format!("Package '{}' is not importable", project.package)).into());
    };

    match project
        .distribution
        .verify(python, &module_path, Strictness::Strict)
    {
        Ok(Some(installed)) => Ok(Outcome::message(format!(
            "{} {} installed at {}",
            installed.project_name,
            installed.version,
            installed.location.display()
        ))),
        Ok(None) => Err(CommandError::new(
            MetaError::DistributionNotFound {
                requirement: project.distribution.to_string(),
            }
            .to_string(),
        )
        .into()),
        Err(e) if e.is_verification_failure() => Err(CommandError::new(e.to_string()).into()),
        Err(e) => Err(e.into()),
    }
}
