/// Avogadro constant in mol⁻¹ (exact SI value).
pub const AVOGADRO_CONSTANT: f64 = 6.022_140_76e23;

pub const GOLD_DENSITY_G_PER_CM3: f64 = 19.3;
pub const GOLD_MOLAR_MASS_G_PER_MOL: f64 = 197.0;

pub const METERS_PER_CENTIMETER: f64 = 0.01;

/// Volume of the reference cube used to derive the lattice spacing, in cm³.
pub const REFERENCE_VOLUME_CM3: f64 = 1.0;
