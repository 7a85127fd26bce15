//! Crossbar description format.
//!
//! A small, line-oriented text format for describing a crossbar: its device
//! model and calibration, line and terminal resistances, terminal bias, and
//! the target conductance matrix one row at a time.
//!
//! # Grammar Overview
//!
//! ```text
//! description = { line }
//! line        = comment | directive | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = '.' directive_name { argument }
//! argument    = value | key '=' value
//! value       = number [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Directives
//!
//! | Directive | Description | Syntax |
//! |-----------|-------------|--------|
//! | .size | Declare the geometry | `.size <rows> <cols>` |
//! | .device | Device model and calibration | `.device <static\|dynamic\|linear> [temperature=<K>] [frequency=<Hz>]` |
//! | .lines | Line and terminal resistances | `.lines [r_wl=] [r_bl=] [r_in=] [r_out=]` |
//! | .bias | Non-signal terminal voltages | `.bias [v_bl_in=] [v_bl_out=] [v_wl_out=]` |
//! | .row | One row of target conductances | `.row <g> <g> ...` |
//!
//! # Example
//!
//! ```text
//! # 2x3 array, 2.5 ohm segments
//! .size 2 3
//! .device static temperature=300
//! .lines r_wl=2.5 r_bl=2.5 r_in=50 r_out=50
//! .row 100u  20u 316u
//! .row  10u 200u  50u
//! ```

mod parser;

pub use parser::{parse_value, Parser};

use nalgebra::DMatrix;

use crate::crossbar::{BiasConfig, Crossbar, LineParams};
use crate::devices::{DeviceModel, DeviceParams};
use crate::error::{CrossbarError, Result};

/// Uniform voltages on the non-signal terminals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiasValues {
    pub v_bl_in: f64,
    pub v_bl_out: f64,
    pub v_wl_out: f64,
}

/// A parsed crossbar description.
#[derive(Debug, Clone, Default)]
pub struct CrossbarConfig {
    /// Declared geometry, if any
    pub size: Option<(usize, usize)>,
    /// Device model for every cell
    pub model: DeviceModel,
    /// Calibration parameters
    pub device: DeviceParams,
    /// Line and terminal resistances
    pub lines: LineParams,
    /// Terminal bias
    pub bias: BiasValues,
    /// Target conductance rows
    pub rows: Vec<Vec<f64>>,
}

impl CrossbarConfig {
    /// Target conductance matrix, checked against the declared geometry.
    pub fn conductance_matrix(&self) -> Result<DMatrix<f64>> {
        let rows = self.rows.len();
        let cols = self.rows.first().map_or(0, Vec::len);

        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != cols {
                return Err(CrossbarError::shape_mismatch(
                    format!("conductance row {}", i),
                    cols,
                    row.len(),
                ));
            }
        }

        if let Some((n, m)) = self.size {
            if (n, m) != (rows, cols) {
                return Err(CrossbarError::shape_mismatch(
                    "conductance matrix",
                    format!("{}x{}", n, m),
                    format!("{}x{}", rows, cols),
                ));
            }
        }

        Ok(DMatrix::from_row_iterator(
            rows,
            cols,
            self.rows.iter().flatten().copied(),
        ))
    }

    /// Program and calibrate the described crossbar.
    pub fn build(&self) -> Result<Crossbar> {
        let ideal = self.conductance_matrix()?;
        let (rows, cols) = ideal.shape();
        let bias = BiasConfig::uniform(
            rows,
            cols,
            self.bias.v_bl_in,
            self.bias.v_bl_out,
            self.bias.v_wl_out,
        );
        Crossbar::new(self.model, self.device, ideal, self.lines)?.with_bias(bias)
    }
}

/// Parse a crossbar description string.
pub fn parse(input: &str) -> Result<CrossbarConfig> {
    Parser::new(input).parse()
}

/// Parse a crossbar description file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<CrossbarConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CrossbarError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EXAMPLE: &str = "
        # 2x3 array
        .size 2 3
        .device dynamic temperature=310 frequency=10k
        .lines r_wl=1 r_bl=2 r_in=50 r_out=100
        .bias v_bl_out=0.1
        .row 100u  20u 316u
        .row  10u 200u  50u ; second row
    ";

    #[test]
    fn test_parse_example() {
        let config = parse(EXAMPLE).unwrap();
        assert_eq!(config.size, Some((2, 3)));
        assert_eq!(config.model, DeviceModel::Dynamic);
        assert_relative_eq!(config.device.temperature, 310.0);
        assert_relative_eq!(config.device.frequency, 1e4);
        assert_relative_eq!(config.lines.r_bl, 2.0);
        assert_relative_eq!(config.lines.r_out, 100.0);
        assert_relative_eq!(config.bias.v_bl_out, 0.1);
        assert_eq!(config.rows.len(), 2);
    }

    #[test]
    fn test_build_example() {
        let xbar = parse(EXAMPLE).unwrap().build().unwrap();
        assert_eq!((xbar.rows(), xbar.cols()), (2, 3));
        assert_relative_eq!(xbar.ideal_conductance()[(1, 1)], 200e-6);
        assert_relative_eq!(xbar.network().bias.v_bl_out[1], 0.1);
    }

    #[test]
    fn test_size_mismatch() {
        let config = parse(".size 2 2\n.row 1u 2u 3u\n.row 1u 2u 3u").unwrap();
        assert!(matches!(
            config.build(),
            Err(CrossbarError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_ragged_rows() {
        let config = parse(".row 1u 2u\n.row 1u").unwrap();
        assert!(matches!(
            config.conductance_matrix(),
            Err(CrossbarError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_defaults_without_directives() {
        let xbar = parse(".row 100u").unwrap().build().unwrap();
        assert_eq!(xbar.model, DeviceModel::Static);
        assert_eq!(xbar.network().lines, LineParams::default());
    }
}
