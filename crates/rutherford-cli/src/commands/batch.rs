use crate::cli::BatchArgs;
use crate::config::lattice_from_args;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use rutherford::engine::progress::ProgressReporter;
use rutherford::workflows;
use tracing::info;

pub fn run(args: BatchArgs) -> Result<()> {
    let lattice = lattice_from_args(&args.lattice)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(
        "Firing {} particles at a nucleus radius of {:e} m.",
        args.trials, args.radius
    );
    let report = workflows::batch::run(&lattice, args.trials, args.radius, &reporter)?;

    println!(
        "{} hits of {} ({})",
        report.outcome.hits,
        report.outcome.trials,
        report.outcome.rate()
    );
    println!(
        "Expected rate for r = {:e} m over spacing {:e} m: {}",
        report.nucleus_radius, report.interatomic_spacing, report.expected_rate
    );

    Ok(())
}
