//! Dense LU solve of the assembled node equations.

use nalgebra::{DMatrix, DVector};
use tracing::warn;

use super::assembly::CircuitSystem;
use crate::error::{CrossbarError, Result};

/// Caller-owned diagnostic cache of the last inverted coefficient matrix.
///
/// Passing a cache to a solve never changes its result; it only records
/// M⁻¹ so that further right-hand sides can be probed without re-assembly.
#[derive(Debug, Clone, Default)]
pub struct SolveCache {
    inverse: Option<DMatrix<f64>>,
}

impl SolveCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inverse of the last solved coefficient matrix.
    pub fn inverse(&self) -> Option<&DMatrix<f64>> {
        self.inverse.as_ref()
    }

    /// Dimension of the last solved system.
    pub fn size(&self) -> Option<usize> {
        self.inverse.as_ref().map(|m| m.nrows())
    }

    /// Apply the cached inverse to another right-hand side.
    pub fn apply(&self, rhs: &DVector<f64>) -> Option<DVector<f64>> {
        self.inverse
            .as_ref()
            .filter(|m| m.ncols() == rhs.len())
            .map(|m| m * rhs)
    }

    /// Drop the cached inverse.
    pub fn clear(&mut self) {
        self.inverse = None;
    }
}

/// Solve M·V = E for the full node-voltage vector.
pub fn solve(system: &CircuitSystem, cache: Option<&mut SolveCache>) -> Result<DVector<f64>> {
    let singular = || {
        warn!(size = system.size, "coefficient matrix is singular");
        CrossbarError::SingularSystem { size: system.size }
    };

    let lu = system.to_dense().lu();
    let x = lu.solve(&system.rhs).ok_or_else(singular)?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(singular());
    }

    if let Some(cache) = cache {
        cache.inverse = lu.try_inverse();
    }

    Ok(x)
}
