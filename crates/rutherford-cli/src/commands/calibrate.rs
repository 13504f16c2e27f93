use crate::cli::CalibrateArgs;
use crate::config::PartialCalibrationConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use rutherford::engine::progress::ProgressReporter;
use rutherford::workflows::{self, calibrate::CalibrationResult};
use tracing::info;

const METERS_PER_FEMTOMETER: f64 = 1e-15;

pub fn run(args: CalibrateArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialCalibrationConfig::from_file(path)?,
        None => PartialCalibrationConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let final_config = partial_config.merge_with_cli(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Calibrating nucleus radius against a deflection probability of {}...",
        final_config.search.target_probability
    );
    info!("Invoking the core calibration workflow...");

    let result = workflows::calibrate::run(&final_config, &reporter)?;

    info!(
        "Workflow finished after {} iteration(s).",
        result.iterations
    );
    print_summary(&result);

    Ok(())
}

fn print_summary(result: &CalibrationResult) {
    println!(
        "Lattice: {0}x{0} atoms, spacing {1:e} m, side {2:e} m",
        result.atoms_per_side, result.interatomic_spacing, result.side_length
    );
    for record in &result.history {
        println!(
            "  #{:<3} r = {:e} m  rate = {}",
            record.iteration, record.candidate, record.observed_rate
        );
    }
    println!(
        "Final radius of nucleus: {:e} m ({:.3} fm)",
        result.radius,
        result.radius / METERS_PER_FEMTOMETER
    );
}
