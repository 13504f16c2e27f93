use super::config::ConfigError;
use super::error::EngineError;
use super::oracle::DeflectionOracle;
use super::progress::{Progress, ProgressReporter};
use super::state::{CalibrationState, FailureReason, IterationRecord, SearchBracket};
use tracing::{debug, info, instrument, warn};

/// Bisection search for the nucleus radius whose deflection rate matches a target probability.
///
/// Every evaluation halves the bracket. A candidate deflecting less than the target replaces
/// `upper`; any other candidate replaces `lower`. The search converges once two consecutive
/// candidates differ by less than the tolerance.
pub struct RadiusCalibrator<O> {
    oracle: O,
    target_probability: f64,
    tolerance: f64,
    bracket: SearchBracket,
    previous_candidate: Option<f64>,
    state: CalibrationState,
    evaluations: usize,
    history: Vec<IterationRecord>,
}

impl<O: DeflectionOracle> RadiusCalibrator<O> {
    pub fn new(
        oracle: O,
        bracket: SearchBracket,
        target_probability: f64,
        tolerance: f64,
    ) -> Result<Self, EngineError> {
        if !bracket.lower.is_finite() || !bracket.upper.is_finite() {
            return Err(EngineError::InvalidBracket {
                lower: bracket.lower,
                upper: bracket.upper,
                reason: "bounds must be finite",
            });
        }
        if !(0.0..=1.0).contains(&target_probability) {
            return Err(ConfigError::InvalidParameter {
                name: "target_probability",
                reason: format!("{target_probability} is not a probability"),
            }
            .into());
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "tolerance",
                reason: format!("{tolerance:e} must be a positive length"),
            }
            .into());
        }

        Ok(Self {
            oracle,
            target_probability,
            tolerance,
            bracket,
            previous_candidate: None,
            state: CalibrationState::Searching,
            evaluations: 0,
            history: Vec::new(),
        })
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn bracket(&self) -> SearchBracket {
        self.bracket
    }

    /// Number of oracle evaluations performed so far.
    pub fn iterations(&self) -> usize {
        self.evaluations
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_oracle(self) -> O {
        self.oracle
    }

    pub fn step(&mut self) -> Result<CalibrationState, EngineError> {
        if self.state.is_terminal() || self.try_converge() {
            return Ok(self.state);
        }

        let candidate = self.bracket.midpoint();
        let observed_rate = self.oracle.deflection_rate(candidate)?;
        self.evaluations += 1;

        if !observed_rate.is_finite() {
            warn!(candidate, "Oracle returned a non-finite deflection rate.");
            self.state = CalibrationState::Failed(FailureReason::NonFiniteRate { radius: candidate });
            return Ok(self.state);
        }

        // Too few deflections means the nucleus must grow: pull in the small-radius bound.
        if observed_rate < self.target_probability {
            self.bracket.upper = candidate;
        } else {
            self.bracket.lower = candidate;
        }
        self.previous_candidate = Some(candidate);

        self.history.push(IterationRecord {
            iteration: self.evaluations,
            candidate,
            observed_rate,
            bracket: self.bracket,
        });
        debug!(
            lower = self.bracket.lower,
            upper = self.bracket.upper,
            "Bracket narrowed."
        );

        Ok(self.state)
    }

    /// Steps until convergence, failure, or `max_iterations` oracle evaluations in total.
    pub fn run(&mut self, max_iterations: usize) -> Result<f64, EngineError> {
        self.run_with_progress(max_iterations, &ProgressReporter::new())
    }

    #[instrument(skip_all, name = "radius_calibration", fields(max_iterations))]
    pub fn run_with_progress(
        &mut self,
        max_iterations: usize,
        reporter: &ProgressReporter,
    ) -> Result<f64, EngineError> {
        loop {
            match self.state {
                CalibrationState::Converged { radius } => {
                    info!(
                        radius,
                        iterations = self.evaluations,
                        "Calibration converged."
                    );
                    return Ok(radius);
                }
                CalibrationState::Failed(FailureReason::NonFiniteRate { radius }) => {
                    return Err(EngineError::NonFiniteRate { radius });
                }
                CalibrationState::Failed(FailureReason::IterationBudgetExhausted { iterations }) => {
                    warn!(iterations, "Iteration budget exhausted before convergence.");
                    return Err(EngineError::Convergence { iterations });
                }
                CalibrationState::Searching => {}
            }

            if self.evaluations >= max_iterations {
                if !self.try_converge() {
                    self.state = CalibrationState::Failed(FailureReason::IterationBudgetExhausted {
                        iterations: self.evaluations,
                    });
                }
                continue;
            }

            let evaluations_before = self.evaluations;
            self.step()?;
            if self.evaluations > evaluations_before {
                if let Some(record) = self.history.last() {
                    info!(
                        "Trying nucleus radius {:e} m: deflection rate {:.6e} (target {:.6e})",
                        record.candidate, record.observed_rate, self.target_probability
                    );
                    reporter.report(Progress::StatusUpdate {
                        text: format!(
                            "iteration {}: r = {:.4e} m, rate = {:.4e}",
                            record.iteration, record.candidate, record.observed_rate
                        ),
                    });
                }
                reporter.report(Progress::TaskIncrement);
            }
        }
    }

    fn try_converge(&mut self) -> bool {
        let candidate = self.bracket.midpoint();
        match self.previous_candidate {
            Some(previous) if (candidate - previous).abs() < self.tolerance => {
                self.state = CalibrationState::Converged { radius: candidate };
                true
            }
            _ => false,
        }
    }
}
