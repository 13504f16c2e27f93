use rutherford::core::material::Material;
use rutherford::engine::config as core_config;

pub struct DefaultsConfig {
    pub atoms_per_side: u32,
    pub material: Material,
    pub target_probability: f64,
    pub trials_per_batch: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub initial_upper: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            atoms_per_side: core_config::DEFAULT_ATOMS_PER_SIDE,
            material: Material::gold(),
            target_probability: core_config::GEIGER_MARSDEN_DEFLECTION_PROBABILITY,
            trials_per_batch: core_config::DEFAULT_TRIALS_PER_BATCH,
            tolerance: core_config::DEFAULT_TOLERANCE,
            max_iterations: core_config::DEFAULT_MAX_ITERATIONS,
            initial_upper: core_config::DEFAULT_RADIUS_FLOOR,
        }
    }
}
