//! Crossbar state and network description.
//!
//! The [`Crossbar`] owns one calibrated device per cell together with the
//! ideal and fitted conductance matrices. Its [`Network`] carries the
//! geometry, line and terminal conductances, and terminal bias that the
//! equivalent-circuit builder turns into a linear system.

mod array;
mod network;
mod types;
mod validate;

pub use array::Crossbar;
pub use network::Network;
pub use types::*;
pub use validate::{check_matrix_shape, check_vector_len};
