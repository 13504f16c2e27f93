//! # Workflows Module
//!
//! High-level entry points that assemble a lattice, an oracle and the calibrator from a single
//! configuration value.
//!
//! - **Calibration Workflow** ([`calibrate`]) - Full bisection search for the nucleus radius
//! - **Batch Workflow** ([`batch`]) - A single batch of trials at a fixed radius

pub mod batch;
pub mod calibrate;
