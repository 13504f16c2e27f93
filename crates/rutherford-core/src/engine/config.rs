use crate::core::lattice::{LatticeError, LatticeModel};
use crate::core::material::Material;
use thiserror::Error;

pub const DEFAULT_ATOMS_PER_SIDE: u32 = 100;
/// Fraction of alpha particles reflected by the gold foil in the Geiger-Marsden experiment.
pub const GEIGER_MARSDEN_DEFLECTION_PROBABILITY: f64 = 1.0 / 8000.0;
pub const DEFAULT_TRIALS_PER_BATCH: usize = 100_000;
pub const DEFAULT_TOLERANCE: f64 = 1e-20;
/// Vanishingly small radius that brackets the search from below.
pub const DEFAULT_RADIUS_FLOOR: f64 = 1e-20;
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatticeConfig {
    pub atoms_per_side: u32,
    pub material: Material,
    pub seed: Option<u64>,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            atoms_per_side: DEFAULT_ATOMS_PER_SIDE,
            material: Material::gold(),
            seed: None,
        }
    }
}

impl LatticeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.atoms_per_side == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "atoms_per_side",
                reason: "must be positive".to_string(),
            });
        }
        self.material
            .validate()
            .map_err(|e| ConfigError::InvalidParameter {
                name: "material",
                reason: e.to_string(),
            })
    }

    /// Builds a lattice seeded from `seed`, or from system entropy when no seed is set.
    pub fn build_model(&self) -> Result<LatticeModel, LatticeError> {
        match self.seed {
            Some(seed) => LatticeModel::with_seed(self.atoms_per_side, &self.material, seed),
            None => LatticeModel::new(self.atoms_per_side, &self.material),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub target_probability: f64,
    pub tolerance: f64,
    /// Bound replaced by the candidate whenever the observed rate reaches the target.
    /// `None` resolves to the interatomic spacing of the lattice.
    pub initial_lower: Option<f64>,
    /// Bound replaced by the candidate whenever the observed rate falls short of the target.
    pub initial_upper: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target_probability: GEIGER_MARSDEN_DEFLECTION_PROBABILITY,
            tolerance: DEFAULT_TOLERANCE,
            initial_lower: None,
            initial_upper: DEFAULT_RADIUS_FLOOR,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.target_probability) {
            return Err(ConfigError::InvalidParameter {
                name: "target_probability",
                reason: format!("{} is not a probability", self.target_probability),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "tolerance",
                reason: format!("{:e} must be a positive length", self.tolerance),
            });
        }
        for (name, bound) in [
            ("initial_lower", self.initial_lower),
            ("initial_upper", Some(self.initial_upper)),
        ] {
            if let Some(value) = bound {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidParameter {
                        name,
                        reason: format!("{value:e} must be a finite, non-negative radius"),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    pub lattice: LatticeConfig,
    pub search: SearchConfig,
    pub trials_per_batch: usize,
    pub max_iterations: usize,
}

#[derive(Default)]
pub struct CalibrationConfigBuilder {
    atoms_per_side: Option<u32>,
    material: Option<Material>,
    seed: Option<u64>,
    target_probability: Option<f64>,
    tolerance: Option<f64>,
    initial_lower: Option<f64>,
    initial_upper: Option<f64>,
    trials_per_batch: Option<usize>,
    max_iterations: Option<usize>,
}

impl CalibrationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atoms_per_side(mut self, atoms: u32) -> Self {
        self.atoms_per_side = Some(atoms);
        self
    }
    pub fn material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn target_probability(mut self, probability: f64) -> Self {
        self.target_probability = Some(probability);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn initial_lower(mut self, radius: Option<f64>) -> Self {
        self.initial_lower = radius;
        self
    }
    pub fn initial_upper(mut self, radius: f64) -> Self {
        self.initial_upper = Some(radius);
        self
    }
    pub fn trials_per_batch(mut self, trials: usize) -> Self {
        self.trials_per_batch = Some(trials);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn build(self) -> Result<CalibrationConfig, ConfigError> {
        let lattice = LatticeConfig {
            atoms_per_side: self.atoms_per_side.unwrap_or(DEFAULT_ATOMS_PER_SIDE),
            material: self.material.unwrap_or_default(),
            seed: self.seed,
        };
        let search = SearchConfig {
            target_probability: self
                .target_probability
                .ok_or(ConfigError::MissingParameter("target_probability"))?,
            tolerance: self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
            initial_lower: self.initial_lower,
            initial_upper: self.initial_upper.unwrap_or(DEFAULT_RADIUS_FLOOR),
        };
        let config = CalibrationConfig {
            lattice,
            search,
            trials_per_batch: self.trials_per_batch.unwrap_or(DEFAULT_TRIALS_PER_BATCH),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
        };

        config.lattice.validate()?;
        config.search.validate()?;
        if config.trials_per_batch == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "trials_per_batch",
                reason: "must be positive".to_string(),
            });
        }
        if config.max_iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_iterations",
                reason: "must be positive".to_string(),
            });
        }
        Ok(config)
    }
}
