use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "structparity developers",
    version,
    about = "structparity - Certify that the PDB and mmCIF records of the same entries describe identical structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the platform configuration directory, if present.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root of the snapshot cache holding the parsed records.
    /// Must not be the system temporary directory.
    #[arg(long, global = true, env = "PDB_DIR", value_name = "PATH")]
    pub storage_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare every entry of the large (1,000 entry) corpus.
    Large(RunArgs),
    /// Compare every entry of the very large (10,000 entry) corpus.
    VeryLarge(RunArgs),
    /// Compare a single entry and print the verdict.
    Check(CheckArgs),
    /// Validate a corpus list (and optionally an exception table) without comparing anything.
    Lint(LintArgs),
}

/// Which built-in corpus a batch run uses by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusSize {
    Large,
    VeryLarge,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// One dot per entry, with a line break every `dots-per-line` entries.
    #[default]
    Dots,
    /// An interactive progress bar.
    Bar,
}

/// Arguments for the `large` and `very-large` subcommands.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Use this corpus list instead of the default one.
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Record failing entries and continue instead of stopping at the first one.
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Fetch the two records of each entry concurrently.
    #[arg(long)]
    pub parallel_fetch: bool,

    /// CSV table of known exceptions (`pdb_id,field,chain,reason`).
    #[arg(short, long, value_name = "PATH")]
    pub exceptions: Option<PathBuf>,

    /// Write a CSV report of failed and waived entries when the run completes.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// How progress is rendered on the terminal.
    #[arg(long, value_enum, default_value_t = ProgressMode::Dots)]
    pub progress: ProgressMode,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S comparison.resolution-tolerance=0.02
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Four-character PDB identifier of the entry to compare (e.g., 1abc).
    #[arg(required = true, value_name = "ID")]
    pub id: String,

    /// CSV table of known exceptions (`pdb_id,field,chain,reason`).
    #[arg(short, long, value_name = "PATH")]
    pub exceptions: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `lint` subcommand.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Corpus list to validate.
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,

    /// Also validate this exception table.
    #[arg(short, long, value_name = "PATH")]
    pub exceptions: Option<PathBuf>,
}
