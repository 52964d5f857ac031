//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::ffi::OsString;
use std::path::PathBuf;

const EXIT_STATUS_HELP: &str = "\
Exit status:
  0  success
  1  fatal error, or verify found differences or missing files
  2  invalid command-line usage
  3  a requested name is not in the manifest";

#[derive(Parser)]
#[command(name = "metatar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = EXIT_STATUS_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Long listings and operation summaries
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress summaries and progress (diagnostics are still printed)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record metadata and content digests of filesystem trees
    #[command(visible_alias = "c")]
    Create(CreateArgs),
    /// List manifest entries
    #[command(visible_alias = "t")]
    List(ListArgs),
    /// Compare manifest entries with the live filesystem
    #[command(visible_alias = "d")]
    Verify(VerifyArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Manifest to write ('-' or absent: standard output)
    #[arg(short = 'f', long = "file", value_name = "MANIFEST")]
    pub file: Option<OsString>,

    /// Files or directories to record
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Manifest to read ('-' or absent: standard input)
    #[arg(short = 'f', long = "file", value_name = "MANIFEST")]
    pub file: Option<OsString>,

    /// Entries to list (directories need a trailing '/'); all if none
    #[arg(value_name = "NAME")]
    pub names: Vec<OsString>,
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Manifest to read ('-' or absent: standard input)
    #[arg(short = 'f', long = "file", value_name = "MANIFEST")]
    pub file: Option<OsString>,

    /// Do not compare access times
    #[arg(long)]
    pub ignore_atime: bool,

    /// Do not re-hash regular files
    #[arg(long)]
    pub no_content: bool,

    /// Entries to verify (directories need a trailing '/'); all if none
    #[arg(value_name = "NAME")]
    pub names: Vec<OsString>,
}
