use crate::core::lattice::BatchOutcome;
use crate::engine::config::LatticeConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub nucleus_radius: f64,
    pub interatomic_spacing: f64,
    pub side_length: f64,
    /// Covered fraction of the foil, `π r² / d²`.
    pub expected_rate: f64,
}

#[instrument(skip_all, name = "batch_workflow", fields(trials, nucleus_radius))]
pub fn run(
    config: &LatticeConfig,
    trials: usize,
    nucleus_radius: f64,
    reporter: &ProgressReporter,
) -> Result<BatchReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Bombarding Foil",
    });

    let mut model = config.build_model()?;
    let geometry = *model.geometry();
    let outcome = model.run_batch_outcome(trials, nucleus_radius);

    reporter.report(Progress::PhaseFinish);
    let outcome = outcome?;

    info!(
        "{} hits of {} ({})",
        outcome.hits,
        outcome.trials,
        outcome.rate()
    );

    Ok(BatchReport {
        outcome,
        nucleus_radius,
        interatomic_spacing: geometry.interatomic_spacing(),
        side_length: geometry.side_length(),
        expected_rate: geometry.expected_deflection_rate(nucleus_radius),
    })
}
