//! Core types for the crossbar network.

use std::fmt;

use nalgebra::DVector;

/// Conductance used for a floating (open) terminal, in siemens.
pub const FLOATING_CONDUCTANCE: f64 = 1e-15;

/// Physical line and terminal resistances of the array, in ohms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineParams {
    /// Word-line segment resistance between adjacent cells
    pub r_wl: f64,
    /// Bit-line segment resistance between adjacent cells
    pub r_bl: f64,
    /// Source resistance driving each word-line input
    pub r_in: f64,
    /// Sense resistance terminating each bit-line output
    pub r_out: f64,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            r_wl: 2.5,
            r_bl: 2.5,
            r_in: 50.0,
            r_out: 50.0,
        }
    }
}

impl LineParams {
    /// Create line parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the word-line segment resistance.
    pub fn with_r_wl(mut self, r_wl: f64) -> Self {
        self.r_wl = r_wl;
        self
    }

    /// Set the bit-line segment resistance.
    pub fn with_r_bl(mut self, r_bl: f64) -> Self {
        self.r_bl = r_bl;
        self
    }

    /// Set both segment resistances at once.
    pub fn with_segments(self, r: f64) -> Self {
        self.with_r_wl(r).with_r_bl(r)
    }

    /// Set the word-line input (source) resistance.
    pub fn with_r_in(mut self, r_in: f64) -> Self {
        self.r_in = r_in;
        self
    }

    /// Set the bit-line output (sense) resistance.
    pub fn with_r_out(mut self, r_out: f64) -> Self {
        self.r_out = r_out;
        self
    }
}

/// Fixed voltages on the non-signal terminals.
///
/// `v_bl_in` and `v_bl_out` have one entry per row (bit line), `v_wl_out`
/// one entry per column (word line).
#[derive(Debug, Clone, PartialEq)]
pub struct BiasConfig {
    pub v_bl_in: DVector<f64>,
    pub v_bl_out: DVector<f64>,
    pub v_wl_out: DVector<f64>,
}

impl BiasConfig {
    /// All non-signal terminals tied to 0 V.
    pub fn grounded(rows: usize, cols: usize) -> Self {
        Self::uniform(rows, cols, 0.0, 0.0, 0.0)
    }

    /// The same bias on every line of each terminal group.
    pub fn uniform(rows: usize, cols: usize, v_bl_in: f64, v_bl_out: f64, v_wl_out: f64) -> Self {
        Self {
            v_bl_in: DVector::from_element(rows, v_bl_in),
            v_bl_out: DVector::from_element(rows, v_bl_out),
            v_wl_out: DVector::from_element(cols, v_wl_out),
        }
    }
}

/// Terminal conductances at the four array edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminals {
    /// Word-line input, one per column (driven)
    pub wl_in: DVector<f64>,
    /// Word-line output, one per column (floating)
    pub wl_out: DVector<f64>,
    /// Bit-line input, one per row (floating)
    pub bl_in: DVector<f64>,
    /// Bit-line output, one per row (driven)
    pub bl_out: DVector<f64>,
}

impl Terminals {
    /// Driven word-line inputs and bit-line outputs, the other ends floating.
    pub fn from_params(rows: usize, cols: usize, params: &LineParams) -> Self {
        Self {
            wl_in: DVector::from_element(cols, 1.0 / params.r_in),
            wl_out: DVector::from_element(cols, FLOATING_CONDUCTANCE),
            bl_in: DVector::from_element(rows, FLOATING_CONDUCTANCE),
            bl_out: DVector::from_element(rows, 1.0 / params.r_out),
        }
    }
}

/// A node variable in the solved voltage vector.
///
/// Word-line nodes occupy the first `rows * cols` entries and bit-line nodes
/// the rest; within each half cells are ordered column by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeIndex {
    /// Word-line side of cell (row, col)
    WordLine { row: usize, col: usize },
    /// Bit-line side of cell (row, col)
    BitLine { row: usize, col: usize },
}

impl NodeIndex {
    /// Raw index into the solution vector of a `rows x cols` array.
    pub fn to_index(&self, rows: usize, cols: usize) -> usize {
        match *self {
            NodeIndex::WordLine { row, col } => col * rows + row,
            NodeIndex::BitLine { row, col } => rows * cols + col * rows + row,
        }
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeIndex::WordLine { row, col } => write!(f, "WL[{},{}]", row, col),
            NodeIndex::BitLine { row, col } => write!(f, "BL[{},{}]", row, col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_layout() {
        // 2 rows x 3 cols: word lines 0..6, bit lines 6..12
        let wl = NodeIndex::WordLine { row: 1, col: 2 };
        let bl = NodeIndex::BitLine { row: 0, col: 1 };
        assert_eq!(wl.to_index(2, 3), 5);
        assert_eq!(bl.to_index(2, 3), 8);
    }

    #[test]
    fn test_terminals_from_params() {
        let t = Terminals::from_params(2, 3, &LineParams::new().with_r_in(100.0));
        assert_eq!(t.wl_in.len(), 3);
        assert_eq!(t.bl_out.len(), 2);
        assert_eq!(t.wl_in[0], 0.01);
        assert_eq!(t.bl_in[1], FLOATING_CONDUCTANCE);
    }
}
