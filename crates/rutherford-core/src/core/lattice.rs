use super::material::Material;
use nalgebra::Point2;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use std::f64::consts::PI;
use thiserror::Error;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Relative excess over half the spacing still accepted as a nucleus radius. Admits the first
/// bisection midpoint `(d + floor) / 2` of the conventional bracket.
const RADIUS_SLACK: f64 = 1e-9;

#[cfg(feature = "parallel")]
const TRIALS_PER_CHUNK: usize = 16_384;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    #[error("Invalid lattice configuration: {0}")]
    Configuration(String),

    #[error("Point ({x:e}, {y:e}) m lies outside the foil [0, {side_length:e}] m")]
    OutOfBounds { x: f64, y: f64, side_length: f64 },

    #[error("Domain error: {0}")]
    Domain(String),
}

/// Immutable geometry of a square, one-atom-thick foil.
///
/// The foil is split into square cells of side `d` (the interatomic spacing). Every cell holds
/// exactly one nucleus, centered at `(d/2, d/2)` in cell-local coordinates. Nuclei are never
/// materialized; a point's cell is found by reducing its coordinates modulo `d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoilGeometry {
    atoms_per_side: u32,
    interatomic_spacing: f64,
    side_length: f64,
}

impl FoilGeometry {
    pub fn new(atoms_per_side: u32, material: &Material) -> Result<Self, LatticeError> {
        if atoms_per_side == 0 {
            return Err(LatticeError::Configuration(
                "atoms per side must be positive".to_string(),
            ));
        }
        let interatomic_spacing = material.interatomic_spacing()?;

        Ok(Self {
            atoms_per_side,
            interatomic_spacing,
            side_length: atoms_per_side as f64 * interatomic_spacing,
        })
    }

    pub fn atoms_per_side(&self) -> u32 {
        self.atoms_per_side
    }

    pub fn total_atoms(&self) -> u64 {
        u64::from(self.atoms_per_side).pow(2)
    }

    pub fn interatomic_spacing(&self) -> f64 {
        self.interatomic_spacing
    }

    pub fn side_length(&self) -> f64 {
        self.side_length
    }

    pub fn area(&self) -> f64 {
        self.side_length * self.side_length
    }

    /// Largest radius for which nuclei stay inscribed in their cells.
    pub fn max_valid_radius(&self) -> f64 {
        0.5 * self.interatomic_spacing
    }

    /// Fraction of the foil covered by nuclei of the given radius, valid up to
    /// [`max_valid_radius`](Self::max_valid_radius).
    pub fn expected_deflection_rate(&self, nucleus_radius: f64) -> f64 {
        let d = self.interatomic_spacing;
        PI * nucleus_radius * nucleus_radius / (d * d)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let domain = 0.0..=self.side_length;
        domain.contains(&x) && domain.contains(&y)
    }

    pub fn is_reflected(&self, x: f64, y: f64, nucleus_radius: f64) -> Result<bool, LatticeError> {
        if !self.contains(x, y) {
            return Err(LatticeError::OutOfBounds {
                x,
                y,
                side_length: self.side_length,
            });
        }

        let d = self.interatomic_spacing;
        let local = Point2::new(x % d, y % d);
        let nucleus = Point2::new(0.5 * d, 0.5 * d);

        Ok(nalgebra::distance(&local, &nucleus) <= nucleus_radius)
    }

    pub fn sample_point(&self, rng: &mut impl Rng) -> Point2<f64> {
        Point2::new(
            rng.gen_range(0.0..=self.side_length),
            rng.gen_range(0.0..=self.side_length),
        )
    }

    pub fn validate_radius(&self, nucleus_radius: f64) -> Result<(), LatticeError> {
        if !nucleus_radius.is_finite() || nucleus_radius < 0.0 {
            return Err(LatticeError::Domain(format!(
                "nucleus radius must be a finite, non-negative length, got {nucleus_radius:e} m"
            )));
        }
        let limit = self.max_valid_radius();
        if nucleus_radius > limit * (1.0 + RADIUS_SLACK) {
            return Err(LatticeError::Domain(format!(
                "nucleus radius {nucleus_radius:e} m exceeds half the interatomic spacing ({limit:e} m)"
            )));
        }
        Ok(())
    }

    fn count_hits(
        &self,
        trials: usize,
        nucleus_radius: f64,
        rng: &mut impl Rng,
    ) -> Result<usize, LatticeError> {
        let mut hits = 0;
        for _ in 0..trials {
            let point = self.sample_point(rng);
            if self.is_reflected(point.x, point.y, nucleus_radius)? {
                hits += 1;
            }
        }
        Ok(hits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub hits: usize,
    pub trials: usize,
}

impl BatchOutcome {
    pub fn rate(&self) -> f64 {
        self.hits as f64 / self.trials as f64
    }
}

/// A foil lattice together with the random source used to bombard it.
#[derive(Debug, Clone)]
pub struct LatticeModel {
    geometry: FoilGeometry,
    rng: StdRng,
}

impl LatticeModel {
    pub fn new(atoms_per_side: u32, material: &Material) -> Result<Self, LatticeError> {
        Ok(Self {
            geometry: FoilGeometry::new(atoms_per_side, material)?,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(
        atoms_per_side: u32,
        material: &Material,
        seed: u64,
    ) -> Result<Self, LatticeError> {
        Ok(Self {
            geometry: FoilGeometry::new(atoms_per_side, material)?,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn geometry(&self) -> &FoilGeometry {
        &self.geometry
    }

    pub fn atoms_per_side(&self) -> u32 {
        self.geometry.atoms_per_side()
    }

    pub fn interatomic_spacing(&self) -> f64 {
        self.geometry.interatomic_spacing()
    }

    pub fn side_length(&self) -> f64 {
        self.geometry.side_length()
    }

    pub fn is_reflected(&self, x: f64, y: f64, nucleus_radius: f64) -> Result<bool, LatticeError> {
        self.geometry.is_reflected(x, y, nucleus_radius)
    }

    pub fn sample_uniform_point(&mut self) -> Point2<f64> {
        self.geometry.sample_point(&mut self.rng)
    }

    pub fn run_single_trial(&mut self, nucleus_radius: f64) -> Result<bool, LatticeError> {
        let point = self.sample_uniform_point();
        self.is_reflected(point.x, point.y, nucleus_radius)
    }

    /// Fraction of `trial_count` uniformly random impacts that strike a nucleus.
    pub fn run_batch(&mut self, trial_count: usize, nucleus_radius: f64) -> Result<f64, LatticeError> {
        Ok(self.run_batch_outcome(trial_count, nucleus_radius)?.rate())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn run_batch_outcome(
        &mut self,
        trial_count: usize,
        nucleus_radius: f64,
    ) -> Result<BatchOutcome, LatticeError> {
        if trial_count == 0 {
            return Err(LatticeError::Domain(
                "a batch needs at least one trial".to_string(),
            ));
        }
        self.geometry.validate_radius(nucleus_radius)?;

        let hits = self.count_hits(trial_count, nucleus_radius)?;
        let outcome = BatchOutcome {
            hits,
            trials: trial_count,
        };

        debug!(
            hits,
            trials = trial_count,
            rate = outcome.rate(),
            "Batch complete."
        );
        Ok(outcome)
    }

    #[cfg(not(feature = "parallel"))]
    fn count_hits(&mut self, trial_count: usize, nucleus_radius: f64) -> Result<usize, LatticeError> {
        let geometry = self.geometry;
        geometry.count_hits(trial_count, nucleus_radius, &mut self.rng)
    }

    // Chunk seeds are drawn sequentially from the model's generator, so the outcome for a given
    // seed does not depend on the number of worker threads.
    #[cfg(feature = "parallel")]
    fn count_hits(&mut self, trial_count: usize, nucleus_radius: f64) -> Result<usize, LatticeError> {
        let chunk_count = trial_count.div_ceil(TRIALS_PER_CHUNK);
        let seeds: Vec<u64> = (0..chunk_count).map(|_| self.rng.next_u64()).collect();
        let geometry = self.geometry;

        seeds
            .into_par_iter()
            .enumerate()
            .map(|(index, seed)| {
                let start = index * TRIALS_PER_CHUNK;
                let trials = TRIALS_PER_CHUNK.min(trial_count - start);
                let mut rng = StdRng::seed_from_u64(seed);
                geometry.count_hits(trials, nucleus_radius, &mut rng)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))
    }
}
