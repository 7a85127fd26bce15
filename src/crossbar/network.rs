//! Electrical parameters of the word-line/bit-line ladder network.

use super::types::{BiasConfig, LineParams, NodeIndex, Terminals};
use super::validate::{check_vector_len, validate_geometry, validate_resistance};
use crate::error::Result;

/// Geometry, line conductances, terminals and bias of a crossbar.
///
/// `rows` is the number of bit lines (outputs) and `cols` the number of
/// word lines (inputs).
#[derive(Debug, Clone)]
pub struct Network {
    /// Number of rows (bit lines, outputs)
    pub rows: usize,
    /// Number of columns (word lines, inputs)
    pub cols: usize,
    /// Resistances the network was built from
    pub lines: LineParams,
    /// Word-line segment conductance
    pub g_wl: f64,
    /// Bit-line segment conductance
    pub g_bl: f64,
    /// Terminal conductances at the array edges
    pub terminals: Terminals,
    /// Fixed voltages on the non-signal terminals
    pub bias: BiasConfig,
}

impl Network {
    /// Build a network with all non-signal terminals grounded.
    pub fn new(rows: usize, cols: usize, lines: LineParams) -> Result<Self> {
        validate_geometry(rows, cols)?;
        validate_resistance("r_wl", lines.r_wl)?;
        validate_resistance("r_bl", lines.r_bl)?;
        validate_resistance("r_in", lines.r_in)?;
        validate_resistance("r_out", lines.r_out)?;

        Ok(Self {
            rows,
            cols,
            lines,
            g_wl: 1.0 / lines.r_wl,
            g_bl: 1.0 / lines.r_bl,
            terminals: Terminals::from_params(rows, cols, &lines),
            bias: BiasConfig::grounded(rows, cols),
        })
    }

    /// Replace the terminal bias.
    pub fn with_bias(mut self, bias: BiasConfig) -> Result<Self> {
        check_vector_len("bit-line input bias", &bias.v_bl_in, self.rows)?;
        check_vector_len("bit-line output bias", &bias.v_bl_out, self.rows)?;
        check_vector_len("word-line output bias", &bias.v_wl_out, self.cols)?;
        self.bias = bias;
        Ok(self)
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Dimension of the node-voltage system (two nodes per cell).
    pub fn size(&self) -> usize {
        2 * self.cells()
    }

    /// Word-line node of cell (row, col).
    pub fn word_line(&self, row: usize, col: usize) -> usize {
        NodeIndex::WordLine { row, col }.to_index(self.rows, self.cols)
    }

    /// Bit-line node of cell (row, col).
    pub fn bit_line(&self, row: usize, col: usize) -> usize {
        NodeIndex::BitLine { row, col }.to_index(self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrossbarError;

    #[test]
    fn test_network_conductances() {
        let net = Network::new(2, 3, LineParams::new().with_segments(4.0)).unwrap();
        assert_eq!(net.g_wl, 0.25);
        assert_eq!(net.g_bl, 0.25);
        assert_eq!(net.size(), 12);
    }

    #[test]
    fn test_zero_line_resistance_rejected() {
        let err = Network::new(2, 2, LineParams::new().with_r_bl(0.0)).unwrap_err();
        assert!(matches!(err, CrossbarError::InvalidParameter { ref param, .. } if param == "r_bl"));
    }

    #[test]
    fn test_bias_shape_checked() {
        let net = Network::new(2, 3, LineParams::default()).unwrap();
        let bad = BiasConfig::grounded(3, 2);
        assert!(matches!(
            net.with_bias(bad),
            Err(CrossbarError::ShapeMismatch { .. })
        ));
    }
}
