//! Line-resistance-aware crossbar solver.
//!
//! This module turns a crossbar and an applied voltage vector into node
//! voltages and output currents.
//!
//! ## Node equations
//!
//! Every cell contributes two nodes: one on its word line and one on its bit
//! line, bridged by the device conductance. Kirchhoff's current law at all
//! `2·n·m` nodes gives the block system
//!
//! ```text
//! [ A   B ] [ V_wl ]   [ E_wl ]
//! [ C   D ] [ V_bl ] = [ E_bl ]
//! ```
//!
//! where:
//! - A holds the word-line ladders and device conductances
//! - B, C couple each word-line node to its bit-line node through the device
//! - D holds the (negated) bit-line ladders and device conductances
//! - E carries the driven inputs and biased terminals
//!
//! ## Nonlinear devices
//!
//! The system is linear in the conductance matrix W. Device nonlinearity is
//! handled by fixed-point iteration: solve, re-derive W from the device
//! response at each local voltage drop, and solve again.

mod assembly;
mod linear;
mod refine;
mod vmm;

pub use assembly::{assemble, Block, CircuitSystem};
pub use linear::{solve, SolveCache};
pub use refine::{solve_voltages, NodeVoltages, RefineOutcome};
pub use vmm::VmmMode;

/// Default number of refinement iterations (first-order g(V) correction).
pub const DEFAULT_ITERATIONS: usize = 1;
