//! # Engine Module
//!
//! This module implements the calibration engine: the bisection search that adjusts a candidate
//! nucleus radius until the simulated deflection rate matches the experimentally observed one.
//!
//! ## Overview
//!
//! The search repeatedly asks a [`oracle::DeflectionOracle`] for the deflection rate at the
//! midpoint of its bracket and replaces one bound with that midpoint, depending on whether the
//! rate fell short of the target. The production oracle bombards a
//! [`LatticeModel`](crate::core::lattice::LatticeModel) with a fixed batch of random trials;
//! tests substitute deterministic closures.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Experiment constants, search parameters and their builder
//! - **Oracles** ([`oracle`]) - The evaluation seam between the search and the lattice
//! - **Calibration** ([`calibrator`]) - The `RadiusCalibrator` state machine
//! - **State Tracking** ([`state`]) - Search bracket, calibration states and iteration history
//! - **Progress Monitoring** ([`progress`]) - Progress reporting for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod calibrator;
pub mod config;
pub mod error;
pub mod oracle;
pub mod progress;
pub mod state;
