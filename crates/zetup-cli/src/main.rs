//! Zetup CLI
//!
//! Loads the project in `--project-dir`, builds the command resolver for it
//! and runs one command token.

mod cli;
mod error;
mod logging;

use std::error::Error as _;
use std::io::{self, Write};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{CommandFactory, Parser, error::ErrorKind};
use colored::Colorize;
use zetup_commands::{
    CommandResolver, EXIT_FAILURE, ExternalCommands, INSTANCE_COMMANDS, LIBRARY_COMMANDS, SETUPTOOLS_COMMANDS,
    SetupPy, SystemSpawner, ToolchainCommands, instance_commands, is_static_command, library_commands,
};
use zetup_meta::{BuildStaging, Project, PythonInterpreter};

use cli::Cli;
use error::{CliError, Result};

/// Exit status for errors other than command failures (EX_SOFTWARE)
const EXIT_INTERNAL: u8 = 70;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialise logging: {}", "warning".yellow().bold(), e);
    }

    match run(&cli) {
        Ok(code) => exit_code(code),
        Err(e) => {
            report(&e);
            match e {
                CliError::User { .. } => exit_code(EXIT_FAILURE),
                _ => ExitCode::from(EXIT_INTERNAL),
            }
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    if !cli.project_dir.is_dir() {
        return Err(CliError::user(format!(
            "Project directory not found: {}",
            cli.project_dir.display()
        )));
    }
    let project = match Project::load(&cli.project_dir) {
        Ok(project) => Rc::new(project),
        // Without a project only built-in names can be valid
        Err(_) if !is_static_command(&cli.command) => unknown_command(&cli.command, &static_vocabulary()),
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(name = %project.name, config = %project.config_path.display(), "Loaded project");

    let resolver = build_resolver(cli, project)?;
    if !resolver.contains(&cli.command) {
        unknown_command(&cli.command, &resolver.vocabulary());
    }

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let code = resolver.dispatch(&cli.command, &mut out, &mut err)?;
    out.flush()?;
    Ok(code)
}

/// Wire the four namespaces. Pip build-staging paths, when present under
/// `--prefix`, are passed to every subprocess as `PYTHONPATH`.
fn build_resolver(cli: &Cli, project: Rc<Project>) -> Result<CommandResolver> {
    let pythonpath = match &cli.prefix {
        Some(prefix) => match BuildStaging::discover(prefix)? {
            Some(staging) => Some(staging.pythonpath(std::env::var_os("PYTHONPATH").as_deref())?),
            None => None,
        },
        None => None,
    };

    let mut spawner = SystemSpawner::new(project.root.clone());
    let mut python = PythonInterpreter::new(&cli.python);
    if let Some(path) = pythonpath {
        python = python.with_env("PYTHONPATH", &path);
        spawner = spawner.with_env("PYTHONPATH", path);
    }
    let spawner = Rc::new(spawner);

    Ok(CommandResolver::new()
        .with(library_commands(Rc::clone(&project), Rc::new(python)))
        .with(instance_commands(Rc::clone(&project)))
        .with(ToolchainCommands::new(SetupPy::new(cli.python.clone(), spawner.clone())))
        .with(ExternalCommands::new(project.external_commands.clone(), spawner)))
}

/// Usage error for a token no namespace knows. Exits the process.
fn unknown_command(token: &str, vocabulary: &[String]) -> ! {
    Cli::command()
        .error(
            ErrorKind::InvalidValue,
            format!("unknown command '{}'\n\nKnown commands: {}", token, vocabulary.join(", ")),
        )
        .exit()
}

fn static_vocabulary() -> Vec<String> {
    LIBRARY_COMMANDS
        .iter()
        .chain(INSTANCE_COMMANDS)
        .chain(SETUPTOOLS_COMMANDS)
        .map(|name| name.to_string())
        .collect()
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn report(error: &CliError) {
    eprintln!("{}: {}", "error".red().bold(), error);
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
