mod defaults;

use crate::cli::{CalibrateArgs, LatticeArgs};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use rutherford::core::material::Material;
use rutherford::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialLatticeConfig {
    #[serde(rename = "atoms-per-side")]
    atoms_per_side: Option<u32>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSearchConfig {
    #[serde(rename = "target-probability")]
    target_probability: Option<f64>,
    #[serde(rename = "trials-per-batch")]
    trials_per_batch: Option<usize>,
    tolerance: Option<f64>,
    #[serde(rename = "max-iterations")]
    max_iterations: Option<usize>,
    #[serde(rename = "initial-lower")]
    initial_lower: Option<f64>,
    #[serde(rename = "initial-upper")]
    initial_upper: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialCalibrationConfig {
    lattice: Option<PartialLatticeConfig>,
    material: Option<Material>,
    search: Option<PartialSearchConfig>,
}

impl PartialCalibrationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &CalibrateArgs) -> Result<core_config::CalibrationConfig> {
        self.apply_set_values(&args.set_values)?;

        let defaults = DefaultsConfig::default();
        let lattice = self.lattice.take().unwrap_or_default();
        let search = self.search.take().unwrap_or_default();
        let material = merge_material(&args.lattice, self.material.unwrap_or(defaults.material));

        core_config::CalibrationConfigBuilder::new()
            .atoms_per_side(
                args.lattice
                    .atoms_per_side
                    .or(lattice.atoms_per_side)
                    .unwrap_or(defaults.atoms_per_side),
            )
            .material(material)
            .seed(args.lattice.seed.or(lattice.seed))
            .target_probability(
                args.target_probability
                    .or(search.target_probability)
                    .unwrap_or(defaults.target_probability),
            )
            .trials_per_batch(
                args.trials
                    .or(search.trials_per_batch)
                    .unwrap_or(defaults.trials_per_batch),
            )
            .tolerance(
                args.tolerance
                    .or(search.tolerance)
                    .unwrap_or(defaults.tolerance),
            )
            .max_iterations(
                args.max_iterations
                    .or(search.max_iterations)
                    .unwrap_or(defaults.max_iterations),
            )
            .initial_lower(args.initial_lower.or(search.initial_lower))
            .initial_upper(
                args.initial_upper
                    .or(search.initial_upper)
                    .unwrap_or(defaults.initial_upper),
            )
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "lattice.atoms-per-side" => {
                    self.lattice
                        .get_or_insert_with(Default::default)
                        .atoms_per_side = Some(parse_value(key, value_str)?);
                }
                "lattice.seed" => {
                    self.lattice.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str)?);
                }
                "material.density" => {
                    self.material.get_or_insert_with(Material::default).density =
                        parse_value(key, value_str)?;
                }
                "material.molar-mass" => {
                    self.material
                        .get_or_insert_with(Material::default)
                        .molar_mass = parse_value(key, value_str)?;
                }
                "search.target-probability" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .target_probability = Some(parse_value(key, value_str)?);
                }
                "search.trials-per-batch" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .trials_per_batch = Some(parse_value(key, value_str)?);
                }
                "search.tolerance" => {
                    self.search.get_or_insert_with(Default::default).tolerance =
                        Some(parse_value(key, value_str)?);
                }
                "search.max-iterations" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .max_iterations = Some(parse_value(key, value_str)?);
                }
                "search.initial-lower" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .initial_lower = Some(parse_value(key, value_str)?);
                }
                "search.initial-upper" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .initial_upper = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Resolves the lattice for commands that take no configuration file.
pub fn lattice_from_args(args: &LatticeArgs) -> Result<core_config::LatticeConfig> {
    let defaults = DefaultsConfig::default();
    let config = core_config::LatticeConfig {
        atoms_per_side: args.atoms_per_side.unwrap_or(defaults.atoms_per_side),
        material: merge_material(args, defaults.material),
        seed: args.seed,
    };
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(config)
}

fn merge_material(args: &LatticeArgs, base: Material) -> Material {
    Material::new(
        args.density.unwrap_or(base.density),
        args.molar_mass.unwrap_or(base.molar_mass),
    )
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value_str
        ))
    })
}
