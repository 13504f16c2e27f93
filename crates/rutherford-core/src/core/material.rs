use super::constants::{
    AVOGADRO_CONSTANT, GOLD_DENSITY_G_PER_CM3, GOLD_MOLAR_MASS_G_PER_MOL, METERS_PER_CENTIMETER,
    REFERENCE_VOLUME_CM3,
};
use super::lattice::LatticeError;
use serde::{Deserialize, Serialize};

/// Bulk properties of the foil material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Material {
    /// Density in g/cm³.
    pub density: f64,
    /// Molar mass in g/mol.
    pub molar_mass: f64,
}

impl Material {
    pub const fn new(density: f64, molar_mass: f64) -> Self {
        Self {
            density,
            molar_mass,
        }
    }

    pub const fn gold() -> Self {
        Self::new(GOLD_DENSITY_G_PER_CM3, GOLD_MOLAR_MASS_G_PER_MOL)
    }

    pub fn validate(&self) -> Result<(), LatticeError> {
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(LatticeError::Configuration(format!(
                "density must be a positive number of g/cm³, got {}",
                self.density
            )));
        }
        if !self.molar_mass.is_finite() || self.molar_mass <= 0.0 {
            return Err(LatticeError::Configuration(format!(
                "molar mass must be a positive number of g/mol, got {}",
                self.molar_mass
            )));
        }
        Ok(())
    }

    /// Distance in meters between neighbouring atoms, assuming the atoms of a 1 cm³ sample sit
    /// on a simple cubic lattice.
    pub fn interatomic_spacing(&self) -> Result<f64, LatticeError> {
        self.validate()?;

        let atoms_in_cube =
            (self.density * REFERENCE_VOLUME_CM3 / self.molar_mass) * AVOGADRO_CONSTANT;
        let atoms_along_edge = atoms_in_cube.cbrt();
        let spacing_cm = REFERENCE_VOLUME_CM3.cbrt() / atoms_along_edge;

        Ok(spacing_cm * METERS_PER_CENTIMETER)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::gold()
    }
}
