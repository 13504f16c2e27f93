//! # Core Module
//!
//! Stateless foundation of the simulation.
//!
//! - **Constants** ([`constants`]) - Physical constants and reference material values
//! - **Materials** ([`material`]) - Density and molar mass of the foil material, and the
//!   interatomic spacing derived from them
//! - **Lattice** ([`lattice`]) - The square lattice foil model, single-trial collision test and
//!   batch sampling

pub mod constants;
pub mod lattice;
pub mod material;
