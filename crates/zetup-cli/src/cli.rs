//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Zetup - run project setup commands
#[derive(Parser, Debug)]
#[command(name = "zetup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command to run: a zetup command, a setup.py command, or an
    /// allow-listed external program
    pub command: String,

    /// Directory holding the zetup config file
    #[arg(short = 'C', long, env = "ZETUP_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Python interpreter used for probes and setup.py commands
    #[arg(long, env = "ZETUP_PYTHON", default_value = "python3")]
    pub python: String,

    /// Installation prefix searched for pip build staging directories
    #[arg(long, env = "ZETUP_PREFIX")]
    pub prefix: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
