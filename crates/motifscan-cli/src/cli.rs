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
    author = "motifscan developers",
    version,
    about = "motifscan CLI - Finds enzyme active-site motifs in protein structures by geometric search, sequence admissibility and superposition scoring.",
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

    /// Set the number of threads for parallel matching.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match a motif library (and optional custom motifs) against a set of structures.
    Scan(ScanArgs),
    /// List the motifs in a library, optionally restricted by EC number.
    Motifs(MotifsArgs),
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    // --- Inputs ---
    /// Directory holding the target structures as `<ID>.pdb` or `<ID>.cif` files.
    #[arg(long, value_name = "DIR")]
    pub structures: Option<PathBuf>,

    /// Structure identifiers to scan. Defaults to every structure in the directory.
    #[arg(long, value_name = "ID", num_args(1..))]
    pub ids: Vec<String>,

    /// Path to the motif library in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub motifs: Option<PathBuf>,

    /// Additional motif definitions (one motif per TOML file), matched after the library.
    #[arg(long = "custom", value_name = "PATH", num_args(1..))]
    pub custom_motifs: Vec<PathBuf>,

    /// Restrict library motifs to an EC number prefix (e.g. '3.4' or '3.-.21').
    #[arg(long, value_name = "FILTER")]
    pub ec: Option<String>,

    // --- Matching Overrides ---
    /// Override the precision factor applied to every distance constraint.
    #[arg(short, long, value_name = "FLOAT")]
    pub precision: Option<f64>,

    /// Override the largest number of candidate assignments examined per pair.
    #[arg(long, value_name = "INT")]
    pub max_assignments: Option<usize>,

    /// Disable pairwise pruning of partial assignments.
    #[arg(long)]
    pub no_pruning: bool,

    /// Abandon a single (motif, structure) pair after this many milliseconds.
    #[arg(long, value_name = "MS")]
    pub deadline_ms: Option<u64>,

    /// Ignore stored outcomes older than this many days.
    #[arg(long, value_name = "DAYS")]
    pub record_ttl_days: Option<u32>,

    // --- Persistence and Output ---
    /// Path to the TOML file remembering previous outcomes.
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Do not read or write the outcome store.
    #[arg(long, conflicts_with = "store")]
    pub no_store: bool,

    /// Write the accepted alignments to a CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S matching.precision-factor=1.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `motifs` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MotifsArgs {
    /// Path to the motif library in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub motifs: PathBuf,

    /// Only list motifs whose EC number matches this prefix.
    #[arg(long, value_name = "FILTER")]
    pub ec: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_arguments_parse() {
        let cli = Cli::try_parse_from([
            "motifscan",
            "-vv",
            "scan",
            "--structures",
            "pdb",
            "--ids",
            "1ABC",
            "2XYZ",
            "--motifs",
            "lib.toml",
            "--ec",
            "3.4",
            "-p",
            "1.5",
            "--no-pruning",
            "-S",
            "matching.max-assignments=10",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.structures, Some(PathBuf::from("pdb")));
        assert_eq!(args.ids, vec!["1ABC".to_string(), "2XYZ".to_string()]);
        assert_eq!(args.ec.as_deref(), Some("3.4"));
        assert_eq!(args.precision, Some(1.5));
        assert!(args.no_pruning);
        assert_eq!(args.set_values, vec!["matching.max-assignments=10".to_string()]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["motifscan", "-q", "-v", "motifs", "-m", "lib.toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn store_conflicts_with_no_store() {
        let result =
            Cli::try_parse_from(["motifscan", "scan", "--store", "s.toml", "--no-store"]);
        assert!(result.is_err());
    }

    #[test]
    fn motifs_requires_a_library() {
        assert!(Cli::try_parse_from(["motifscan", "motifs"]).is_err());
    }
}
