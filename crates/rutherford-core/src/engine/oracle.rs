use super::error::EngineError;
use crate::core::lattice::LatticeModel;

/// Source of deflection rates for a candidate nucleus radius.
///
/// The rate must be non-decreasing in the radius for bisection to find the crossing.
pub trait DeflectionOracle {
    fn deflection_rate(&mut self, nucleus_radius: f64) -> Result<f64, EngineError>;
}

impl<F> DeflectionOracle for F
where
    F: FnMut(f64) -> f64,
{
    fn deflection_rate(&mut self, nucleus_radius: f64) -> Result<f64, EngineError> {
        Ok(self(nucleus_radius))
    }
}

/// Measures deflection rates by bombarding a [`LatticeModel`] with fixed-size batches.
#[derive(Debug, Clone)]
pub struct LatticeOracle {
    model: LatticeModel,
    trials_per_batch: usize,
}

impl LatticeOracle {
    pub fn new(model: LatticeModel, trials_per_batch: usize) -> Self {
        Self {
            model,
            trials_per_batch,
        }
    }

    pub fn model(&self) -> &LatticeModel {
        &self.model
    }

    pub fn trials_per_batch(&self) -> usize {
        self.trials_per_batch
    }

    pub fn into_model(self) -> LatticeModel {
        self.model
    }
}

impl DeflectionOracle for LatticeOracle {
    fn deflection_rate(&mut self, nucleus_radius: f64) -> Result<f64, EngineError> {
        Ok(self.model.run_batch(self.trials_per_batch, nucleus_radius)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lattice::LatticeError;
    use crate::core::material::Material;

    #[test]
    fn closures_act_as_oracles() {
        let mut calls = 0;
        let mut oracle = |r: f64| {
            calls += 1;
            r * 2.0
        };
        assert_eq!(oracle.deflection_rate(0.25).unwrap(), 0.5);
        assert_eq!(calls, 1);
    }

    #[test]
    fn lattice_oracle_runs_batches_on_its_model() {
        let model = LatticeModel::with_seed(10, &Material::gold(), 42).unwrap();
        let d = model.interatomic_spacing();
        let mut oracle = LatticeOracle::new(model, 10_000);

        assert_eq!(oracle.deflection_rate(0.0).unwrap(), 0.0);
        let rate = oracle.deflection_rate(0.45 * d).unwrap();
        assert!(rate > 0.5 && rate < 0.7, "rate {rate}");
        assert_eq!(oracle.trials_per_batch(), 10_000);
    }

    #[test]
    fn lattice_errors_propagate_through_the_oracle() {
        let model = LatticeModel::with_seed(10, &Material::gold(), 42).unwrap();
        let mut oracle = LatticeOracle::new(model, 0);
        let result = oracle.deflection_rate(1e-15);
        assert!(matches!(
            result,
            Err(EngineError::Lattice {
                source: LatticeError::Domain(_)
            })
        ));
    }
}
