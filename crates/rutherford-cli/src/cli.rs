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
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "Rutherford CLI - Estimates the radius of an atomic nucleus by bombarding a simulated one-atom-thick foil and matching the Geiger-Marsden deflection rate.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output; command failures are still reported
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to run trials in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for the nucleus radius that reproduces a target deflection probability.
    Calibrate(CalibrateArgs),
    /// Bombard the foil once with a batch of particles at a fixed nucleus radius.
    Batch(BatchArgs),
}

/// Lattice and material overrides shared by all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct LatticeArgs {
    /// Number of atoms along one edge of the square foil.
    #[arg(short = 'n', long, value_name = "INT")]
    pub atoms_per_side: Option<u32>,

    /// Density of the foil material in g/cm³ (default: gold, 19.3).
    #[arg(long, value_name = "FLOAT")]
    pub density: Option<f64>,

    /// Molar mass of the foil material in g/mol (default: gold, 197).
    #[arg(long, value_name = "FLOAT")]
    pub molar_mass: Option<f64>,

    /// Seed for the random number generator, for reproducible runs.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

/// Arguments for the `calibrate` subcommand.
#[derive(Args, Debug)]
pub struct CalibrateArgs {
    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub lattice: LatticeArgs,

    // --- Search Overrides ---
    /// Deflection probability to reproduce (default: 1/8000).
    #[arg(short = 'p', long, value_name = "FLOAT")]
    pub target_probability: Option<f64>,

    /// Number of particles fired at the foil for every candidate radius.
    #[arg(short = 't', long, value_name = "INT")]
    pub trials: Option<usize>,

    /// Stop once consecutive candidate radii differ by less than this many meters.
    #[arg(long, value_name = "METERS")]
    pub tolerance: Option<f64>,

    /// Maximum number of candidate radii to evaluate before giving up.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Starting bound replaced by candidates that deflect enough particles
    /// (default: the interatomic spacing).
    #[arg(long, value_name = "METERS")]
    pub initial_lower: Option<f64>,

    /// Starting bound replaced by candidates that deflect too few particles (default: 1e-20).
    #[arg(long, value_name = "METERS")]
    pub initial_upper: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.trials-per-batch=50000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Nucleus radius in meters.
    #[arg(short, long, required = true, value_name = "METERS")]
    pub radius: f64,

    /// Number of particles to fire at the foil.
    #[arg(short = 't', long, default_value_t = 100_000, value_name = "INT")]
    pub trials: usize,

    #[command(flatten)]
    pub lattice: LatticeArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn calibrate_accepts_scientific_notation_overrides() {
        let cli = Cli::parse_from([
            "rutherford",
            "-vv",
            "calibrate",
            "--tolerance",
            "1e-18",
            "--initial-upper",
            "2.5e-20",
            "-p",
            "0.25",
            "-n",
            "10",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Calibrate(args) = cli.command else {
            panic!("Expected 'calibrate' subcommand");
        };
        assert_eq!(args.tolerance, Some(1e-18));
        assert_eq!(args.initial_upper, Some(2.5e-20));
        assert_eq!(args.target_probability, Some(0.25));
        assert_eq!(args.lattice.atoms_per_side, Some(10));
        assert!(args.config.is_none());
    }

    #[test]
    fn batch_requires_a_radius_and_defaults_trials() {
        assert!(Cli::try_parse_from(["rutherford", "batch"]).is_err());

        let cli = Cli::parse_from(["rutherford", "batch", "--radius", "1e-14"]);
        let Commands::Batch(args) = cli.command else {
            panic!("Expected 'batch' subcommand");
        };
        assert_eq!(args.radius, 1e-14);
        assert_eq!(args.trials, 100_000);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["rutherford", "-q", "-v", "batch", "-r", "1e-14"]);
        assert!(result.is_err());
    }
}
