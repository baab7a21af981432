use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "MDScape Developers",
    version,
    about = "MDScape CLI - Embed structural dissimilarity matrices with metric MDS and measure how tightly each category clusters.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log more detail: -v info, -vv debug, -vvv per-iteration trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write a plain-text log to PATH
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel restarts.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed a dissimilarity matrix and compute per-category dispersion.
    Embed(EmbedArgs),
    /// Check that a dissimilarity matrix satisfies the input contract.
    Validate(ValidateArgs),
}

/// Arguments for the `embed` subcommand.
#[derive(Args, Debug)]
pub struct EmbedArgs {
    // --- Inputs and outputs ---
    /// Square dissimilarity table (CSV); first column and header hold identifiers.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub matrix: PathBuf,

    /// Metadata table mapping identifiers to categories.
    #[arg(long, value_name = "PATH")]
    pub metadata: Option<PathBuf>,

    /// Directory receiving `coordinates.csv` and `dispersion.csv`.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Identifier column of the metadata table.
    #[arg(long, value_name = "NAME")]
    pub id_column: Option<String>,

    /// Category column of the metadata table.
    #[arg(long, value_name = "NAME")]
    pub category_column: Option<String>,

    // --- Embedding overrides ---
    /// Number of embedding dimensions.
    #[arg(short, long, value_name = "INT")]
    pub dimensions: Option<usize>,

    /// Number of independent restarts.
    #[arg(long, value_name = "INT")]
    pub n_init: Option<usize>,

    /// Maximum SMACOF iterations per restart.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Relative stress improvement below which a restart has converged.
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Maximum asymmetry and diagonal deviation accepted in the input matrix.
    #[arg(long, value_name = "FLOAT")]
    pub symmetry_tolerance: Option<f64>,

    /// Master random seed.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Start strategy: 'classical' (default, restart 0 from Torgerson scaling) or 'random'.
    #[arg(long = "init", value_name = "STRATEGY")]
    pub initialization: Option<String>,

    /// Stop iterating after this many seconds and keep the best result so far.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    // --- Dispersion overrides ---
    /// Fail when a label names an identifier missing from the matrix.
    #[arg(long)]
    pub strict_labels: bool,

    /// Report dispersion of categories with fewer than two members as undefined.
    #[arg(long)]
    pub require_pairs: bool,

    /// Print the dispersion ratio of two categories, e.g. `--compare Extended,Compact`.
    #[arg(long, value_name = "A,B")]
    pub compare: Option<String>,

    /// Override one configuration key, e.g. embedding.seed=7.
    /// Repeatable.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Square dissimilarity table (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub matrix: PathBuf,

    /// Maximum asymmetry and diagonal deviation accepted.
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,
}
