//! # Rutherford Core Library
//!
//! Monte Carlo estimation of the effective radius of an atomic nucleus, calibrated against the
//! back-scattering rate observed in the Geiger-Marsden gold foil experiment.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same strict three-layer separation used throughout the project:
//!
//! - **[`core`]: The Foundation.** Physical constants, material descriptions and the
//!   `LatticeModel`, a geometric oracle that decides whether a particle striking a point of a
//!   one-atom-thick foil is deflected by a nucleus.
//!
//! - **[`engine`]: The Logic Core.** The bisection-driven `RadiusCalibrator`, its configuration,
//!   state machine, error types and progress reporting.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that wire a `LatticeModel` into the
//!   calibrator and return a complete result for presentation.

pub mod core;
pub mod engine;
pub mod workflows;
