use crate::engine::calibrator::RadiusCalibrator;
use crate::engine::config::CalibrationConfig;
use crate::engine::error::EngineError;
use crate::engine::oracle::LatticeOracle;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{IterationRecord, SearchBracket};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct CalibrationResult {
    pub radius: f64,
    pub iterations: usize,
    pub atoms_per_side: u32,
    pub interatomic_spacing: f64,
    pub side_length: f64,
    pub target_probability: f64,
    pub history: Vec<IterationRecord>,
}

impl CalibrationResult {
    /// Deflection rate measured at the last evaluated candidate.
    pub fn final_rate(&self) -> Option<f64> {
        self.history.last().map(|record| record.observed_rate)
    }
}

#[instrument(skip_all, name = "calibration_workflow")]
pub fn run(
    config: &CalibrationConfig,
    reporter: &ProgressReporter,
) -> Result<CalibrationResult, EngineError> {
    // === Phase 1: Lattice construction ===
    reporter.report(Progress::PhaseStart {
        name: "Building Lattice",
    });
    let model = config.lattice.build_model()?;
    let geometry = *model.geometry();
    info!(
        atoms_per_side = geometry.atoms_per_side(),
        interatomic_spacing = geometry.interatomic_spacing(),
        side_length = geometry.side_length(),
        "Lattice constructed."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Bisection over the nucleus radius ===
    let bracket = SearchBracket::new(
        config
            .search
            .initial_lower
            .unwrap_or(geometry.interatomic_spacing()),
        config.search.initial_upper,
    );
    info!(
        lower = bracket.lower,
        upper = bracket.upper,
        target_probability = config.search.target_probability,
        trials_per_batch = config.trials_per_batch,
        "Starting radius calibration."
    );

    reporter.report(Progress::PhaseStart {
        name: "Calibrating Nucleus Radius",
    });
    reporter.report(Progress::TaskStart {
        total_steps: expected_iterations(bracket, config.search.tolerance)
            .min(config.max_iterations) as u64,
    });

    let oracle = LatticeOracle::new(model, config.trials_per_batch);
    let mut calibrator = RadiusCalibrator::new(
        oracle,
        bracket,
        config.search.target_probability,
        config.search.tolerance,
    )?;
    let outcome = calibrator.run_with_progress(config.max_iterations, reporter);

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let radius = outcome?;
    info!(radius, "Final nucleus radius found.");

    Ok(CalibrationResult {
        radius,
        iterations: calibrator.iterations(),
        atoms_per_side: geometry.atoms_per_side(),
        interatomic_spacing: geometry.interatomic_spacing(),
        side_length: geometry.side_length(),
        target_probability: config.search.target_probability,
        history: calibrator.history().to_vec(),
    })
}

fn expected_iterations(bracket: SearchBracket, tolerance: f64) -> usize {
    let halvings = (bracket.width() / tolerance).log2().ceil();
    if halvings.is_finite() && halvings > 1.0 {
        halvings as usize
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::Material;
    use crate::engine::config::{CalibrationConfigBuilder, GEIGER_MARSDEN_DEFLECTION_PROBABILITY};
    use std::f64::consts::PI;
    use std::sync::{Arc, Mutex};

    fn small_config(seed: u64) -> CalibrationConfig {
        CalibrationConfigBuilder::new()
            .atoms_per_side(10)
            .material(Material::gold())
            .seed(Some(seed))
            .target_probability(0.5)
            .tolerance(1e-14)
            .trials_per_batch(10_000)
            .build()
            .unwrap()
    }

    #[test]
    fn calibration_recovers_analytic_radius_for_even_odds() {
        let result = run(&small_config(3), &ProgressReporter::new()).unwrap();
        let d = result.interatomic_spacing;
        let expected = d * (0.5 / PI).sqrt();

        assert!((result.radius - expected).abs() < 0.03 * d);
        assert_eq!(result.atoms_per_side, 10);
        assert_eq!(result.side_length, 10.0 * d);
        assert_eq!(result.iterations, result.history.len());
        assert!(result.final_rate().is_some());
    }

    #[test]
    fn seeded_calibrations_are_reproducible() {
        let first = run(&small_config(11), &ProgressReporter::new()).unwrap();
        let second = run(&small_config(11), &ProgressReporter::new()).unwrap();
        assert_eq!(first.radius, second.radius);
        assert_eq!(first.history, second.history);
    }

    #[test]
    fn first_candidate_sits_midway_between_spacing_and_floor() {
        let result = run(&small_config(5), &ProgressReporter::new()).unwrap();
        let first = result.history.first().unwrap();
        assert_eq!(
            first.candidate,
            (result.interatomic_spacing + 1e-20) / 2.0
        );
    }

    #[test]
    fn explicit_lower_bound_overrides_spacing() {
        let mut config = small_config(5);
        config.search.initial_lower = Some(1e-10);
        let result = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.history[0].candidate, (1e-10 + 1e-20) / 2.0);
    }

    #[test]
    fn exhausted_budget_surfaces_as_convergence_error() {
        let mut config = small_config(5);
        config.max_iterations = 3;
        let result = run(&config, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Convergence { iterations: 3 })));
    }

    #[test]
    fn geiger_marsden_target_yields_femtometre_scale_radius() {
        let config = CalibrationConfigBuilder::new()
            .atoms_per_side(100)
            .seed(Some(8000))
            .target_probability(GEIGER_MARSDEN_DEFLECTION_PROBABILITY)
            .tolerance(1e-17)
            .trials_per_batch(200_000)
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new()).unwrap();
        let d = result.interatomic_spacing;
        let expected = d * (GEIGER_MARSDEN_DEFLECTION_PROBABILITY / PI).sqrt();

        assert!(
            (result.radius - expected).abs() < 0.5 * expected,
            "radius {:e}, expected {:e}",
            result.radius,
            expected
        );
    }

    #[test]
    fn workflow_reports_both_phases() {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = phases.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::PhaseStart { name } = event {
                sink.lock().unwrap().push(name);
            }
        }));

        run(&small_config(2), &reporter).unwrap();

        assert_eq!(
            *phases.lock().unwrap(),
            vec!["Building Lattice", "Calibrating Nucleus Radius"]
        );
    }

    #[test]
    fn expected_iterations_handles_degenerate_brackets() {
        assert_eq!(expected_iterations(SearchBracket::new(1.0, 1.0), 1e-3), 1);
        assert_eq!(expected_iterations(SearchBracket::new(1.0, 0.0), 0.25), 2);
        assert_eq!(expected_iterations(SearchBracket::new(1.0, 0.0), 1e-3), 10);
    }
}
