//! Error types for the crossbar simulator.
//!
//! This module provides a unified error type [`CrossbarError`] that covers
//! all error conditions that can occur while parsing a crossbar description,
//! programming devices, and solving the line-resistance network.

use thiserror::Error;

/// Result type alias using [`CrossbarError`].
pub type Result<T> = std::result::Result<T, CrossbarError>;

/// Unified error type for all crossbar operations.
#[derive(Error, Debug)]
pub enum CrossbarError {
    // ============ Construction Errors ============
    /// Unsupported device model identifier
    #[error("Invalid device model '{model}' (expected static, dynamic or linear)")]
    InvalidDeviceModel { model: String },

    /// Matrix or vector dimensions inconsistent with the declared geometry
    #[error("Shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: String,
        found: String,
    },

    /// Invalid line, terminal or calibration parameter
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // ============ Simulation Errors ============
    /// Coefficient matrix is not invertible
    #[error("Singular {size}x{size} system - check that line, terminal and device conductances are positive")]
    SingularSystem { size: usize },

    // ============ Description Errors ============
    /// Malformed crossbar description
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Error reading a crossbar description file
    #[error("Failed to read crossbar file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl CrossbarError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(
        what: impl Into<String>,
        expected: impl std::fmt::Display,
        found: impl std::fmt::Display,
    ) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = CrossbarError::shape_mismatch("conductance matrix", "2x3", "2x4");
        assert_eq!(
            err.to_string(),
            "Shape mismatch for conductance matrix: expected 2x3, found 2x4"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let err = CrossbarError::parse(7, "unknown directive '.foo'");
        assert_eq!(err.to_string(), "Parse error at line 7: unknown directive '.foo'");
    }
}
