//! # Crossbar Core
//!
//! A line-resistance-aware simulator for memristor crossbar arrays used as
//! analog vector-matrix multiply (VMM) accelerators.
//!
//! This library provides:
//! - Calibrated memristor device models behind a common capability trait
//! - Crossbar state: per-cell devices, ideal and fitted conductance matrices
//! - Equivalent-circuit assembly of the word-line/bit-line ladder network
//! - A fixed-point refinement loop for nonlinear device conductance
//! - Four multiply variants of increasing fidelity
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`devices`] - Memristor models and the device capability trait
//! - [`crossbar`] - Crossbar state, geometry, line and terminal parameters
//! - [`solver`] - System assembly, linear solve, refinement and VMM facade
//! - [`config`] - Parser for the crossbar description format
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! crossbar array.xbar --input 0.1,0.2,0.3 --mode lineres --iterations 2
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use crossbar_core::{Crossbar, DeviceModel, DeviceParams, LineParams};
//! use nalgebra::{DMatrix, DVector};
//!
//! let ideal = DMatrix::from_row_slice(2, 2, &[100e-6, 20e-6, 50e-6, 300e-6]);
//! let xbar = Crossbar::new(DeviceModel::Static, DeviceParams::default(), ideal, LineParams::default())?;
//! let out = xbar.lineres_vmm(&DVector::from_vec(vec![0.2, 0.1]), 1)?;
//! # Ok::<(), crossbar_core::CrossbarError>(())
//! ```
//!
//! ## Circuit Simulation Method
//!
//! For an `n x m` array (n bit lines, m word lines) every cell has a
//! word-line node and a bit-line node. The simulator:
//!
//! 1. Assembles the `2nm x 2nm` KCL system M and source vector E
//! 2. Solves MV = E for all node voltages
//! 3. Re-derives each device's conductance at its local voltage drop and
//!    repeats for a fixed number of iterations
//!
//! The output current of each row is the sum of its device currents.

pub mod config;
pub mod crossbar;
pub mod devices;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use crossbar::{BiasConfig, Crossbar, LineParams};
pub use devices::{Device, DeviceModel, DeviceParams, Memristor};
pub use error::{CrossbarError, Result};
pub use solver::{RefineOutcome, SolveCache, VmmMode};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCrossbar;
