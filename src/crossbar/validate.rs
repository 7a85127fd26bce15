//! Shape and parameter checks.

use nalgebra::{DMatrix, DVector};

use crate::error::{CrossbarError, Result};

/// Check that a resistance is positive and finite.
pub fn validate_resistance(param: &str, ohms: f64) -> Result<()> {
    if ohms.is_finite() && ohms > 0.0 {
        Ok(())
    } else {
        Err(CrossbarError::invalid_parameter(
            param,
            format!("resistance must be positive and finite, got {}", ohms),
        ))
    }
}

/// Check that a geometry has at least one row and one column.
pub fn validate_geometry(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(CrossbarError::invalid_parameter(
            "geometry",
            format!("crossbar must have at least one row and column, got {}x{}", rows, cols),
        ));
    }
    Ok(())
}

/// Check that a matrix is `rows x cols`.
pub fn check_matrix_shape(what: &str, matrix: &DMatrix<f64>, rows: usize, cols: usize) -> Result<()> {
    if matrix.shape() != (rows, cols) {
        return Err(CrossbarError::shape_mismatch(
            what,
            format!("{}x{}", rows, cols),
            format!("{}x{}", matrix.nrows(), matrix.ncols()),
        ));
    }
    Ok(())
}

/// Check that a vector has length `len`.
pub fn check_vector_len(what: &str, vector: &DVector<f64>, len: usize) -> Result<()> {
    if vector.len() != len {
        return Err(CrossbarError::shape_mismatch(what, len, vector.len()));
    }
    Ok(())
}
