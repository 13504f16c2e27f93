use super::config::ConfigError;
use crate::core::lattice::LatticeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Lattice evaluation failed: {source}")]
    Lattice {
        #[from]
        source: LatticeError,
    },

    #[error("Invalid calibration configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid search bracket [{lower:e}, {upper:e}]: {reason}")]
    InvalidBracket {
        lower: f64,
        upper: f64,
        reason: &'static str,
    },

    #[error("Deflection rate at radius {radius:e} m is not a finite number")]
    NonFiniteRate { radius: f64 },

    #[error("Algorithm failed to converge after {iterations} iterations")]
    Convergence { iterations: usize },
}
