//! Equivalent-circuit assembly.
//!
//! Builds the Kirchhoff current-law system of the crossbar ladder network:
//!
//! ```text
//! [ A  B ] [ V_wl ]   [ E_wl ]
//! [ C  D ] [ V_bl ] = [ E_bl ]
//! ```
//!
//! - A: word-line ladders (one tridiagonal block per column) plus the device
//!   conductance of every cell on that word line
//! - B: -W, current leaving a word-line node through the device
//! - C: +W, the same device seen from the bit-line equation
//! - D: bit-line ladders, written negated (negative diagonal)
//!
//! Row `k` of the system is the KCL equation of node `k`, so B and C share
//! the same (transposed) sparsity pattern.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::crossbar::{check_matrix_shape, check_vector_len, Network};
use crate::error::Result;

/// Quadrant of the block-structured coefficient matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// Word-line equations, word-line unknowns
    A,
    /// Word-line equations, bit-line unknowns
    B,
    /// Bit-line equations, word-line unknowns
    C,
    /// Bit-line equations, bit-line unknowns
    D,
}

/// Linear system M·V = E in coordinate (triplet) form.
#[derive(Debug, Clone)]
pub struct CircuitSystem {
    /// Dimension of M (two nodes per cell)
    pub size: usize,
    /// (row, col, value) entries of M; duplicates are summed
    pub triplets: Vec<(usize, usize, f64)>,
    /// Right-hand side E
    pub rhs: DVector<f64>,
}

impl CircuitSystem {
    /// Create an empty system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            triplets: Vec::new(),
            rhs: DVector::zeros(size),
        }
    }

    /// Add to coefficient M[row, col].
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.triplets.push((row, col, value));
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.rhs[row] += value;
    }

    /// Number of stored coefficient entries.
    pub fn nnz(&self) -> usize {
        self.triplets.len()
    }

    /// Build the dense coefficient matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(self.size, self.size);
        for &(row, col, value) in &self.triplets {
            m[(row, col)] += value;
        }
        m
    }

    /// Extract one quadrant of the coefficient matrix as a dense block.
    pub fn block(&self, block: Block) -> DMatrix<f64> {
        let half = self.size / 2;
        let (row0, col0) = match block {
            Block::A => (0, 0),
            Block::B => (0, half),
            Block::C => (half, 0),
            Block::D => (half, half),
        };
        let mut m = DMatrix::zeros(half, half);
        for &(row, col, value) in &self.triplets {
            let in_rows = (row0..row0 + half).contains(&row);
            let in_cols = (col0..col0 + half).contains(&col);
            if in_rows && in_cols {
                m[(row - row0, col - col0)] += value;
            }
        }
        m
    }
}

/// Assemble the node equations for conductances `w` and applied word-line
/// voltages `v_applied`.
///
/// `w` must be `rows x cols` and `v_applied` must have one entry per column.
pub fn assemble(network: &Network, w: &DMatrix<f64>, v_applied: &DVector<f64>) -> Result<CircuitSystem> {
    check_matrix_shape("conductance matrix", w, network.rows, network.cols)?;
    check_vector_len("applied voltage vector", v_applied, network.cols)?;

    let mut system = CircuitSystem::new(network.size());
    stamp_word_lines(network, w, &mut system);
    stamp_word_to_bit(network, w, &mut system);
    stamp_bit_to_word(network, w, &mut system);
    stamp_bit_lines(network, w, &mut system);
    stamp_sources(network, v_applied, &mut system);

    debug!(size = system.size, nnz = system.nnz(), "assembled crossbar system");
    Ok(system)
}

/// Block A: word-line ladders plus device conductances.
fn stamp_word_lines(network: &Network, w: &DMatrix<f64>, system: &mut CircuitSystem) {
    let (n, g) = (network.rows, network.g_wl);

    for j in 0..network.cols {
        for i in 0..n {
            let k = network.word_line(i, j);
            let mut diag = w[(i, j)];

            if i > 0 {
                diag += g;
                system.add(k, network.word_line(i - 1, j), -g);
            }
            if i + 1 < n {
                diag += g;
                system.add(k, network.word_line(i + 1, j), -g);
            }
            if i == 0 {
                diag += network.terminals.wl_in[j];
            }
            if i == n - 1 {
                diag += network.terminals.wl_out[j];
            }

            system.add(k, k, diag);
        }
    }
}

/// Block B: each device pulls its word-line node toward its bit-line node.
fn stamp_word_to_bit(network: &Network, w: &DMatrix<f64>, system: &mut CircuitSystem) {
    for j in 0..network.cols {
        for i in 0..network.rows {
            system.add(network.word_line(i, j), network.bit_line(i, j), -w[(i, j)]);
        }
    }
}

/// Block C: device current entering the bit-line node from its word line.
fn stamp_bit_to_word(network: &Network, w: &DMatrix<f64>, system: &mut CircuitSystem) {
    for j in 0..network.cols {
        for i in 0..network.rows {
            system.add(network.bit_line(i, j), network.word_line(i, j), w[(i, j)]);
        }
    }
}

/// Block D: negated bit-line ladders plus device conductances.
fn stamp_bit_lines(network: &Network, w: &DMatrix<f64>, system: &mut CircuitSystem) {
    let (m, g) = (network.cols, network.g_bl);

    for i in 0..network.rows {
        for j in 0..m {
            let k = network.bit_line(i, j);
            let mut diag = w[(i, j)];

            if j > 0 {
                diag += g;
                system.add(k, network.bit_line(i, j - 1), g);
            }
            if j + 1 < m {
                diag += g;
                system.add(k, network.bit_line(i, j + 1), g);
            }
            if j == 0 {
                diag += network.terminals.bl_in[i];
            }
            if j == m - 1 {
                diag += network.terminals.bl_out[i];
            }

            system.add(k, k, -diag);
        }
    }
}

/// Source vector E: driven word-line inputs and biased terminals.
fn stamp_sources(network: &Network, v_applied: &DVector<f64>, system: &mut CircuitSystem) {
    let (n, m) = (network.rows, network.cols);
    let t = &network.terminals;
    let bias = &network.bias;

    for j in 0..m {
        system.add_source(network.word_line(0, j), v_applied[j] * t.wl_in[j]);
        system.add_source(network.word_line(n - 1, j), bias.v_wl_out[j] * t.wl_out[j]);
    }
    for i in 0..n {
        system.add_source(network.bit_line(i, 0), -bias.v_bl_in[i] * t.bl_in[i]);
        system.add_source(network.bit_line(i, m - 1), -bias.v_bl_out[i] * t.bl_out[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossbar::{BiasConfig, LineParams, FLOATING_CONDUCTANCE};
    use crate::error::CrossbarError;
    use approx::assert_relative_eq;

    fn network(rows: usize, cols: usize) -> Network {
        Network::new(
            rows,
            cols,
            LineParams::new().with_r_wl(2.0).with_r_bl(4.0).with_r_in(10.0).with_r_out(20.0),
        )
        .unwrap()
    }

    fn conductances(rows: usize, cols: usize) -> DMatrix<f64> {
        DMatrix::from_fn(rows, cols, |i, j| 1e-5 * (1 + i * cols + j) as f64)
    }

    #[test]
    fn test_system_size() {
        let net = network(3, 2);
        let sys = assemble(&net, &conductances(3, 2), &DVector::from_element(2, 0.1)).unwrap();
        assert_eq!(sys.size, 12);
        assert_eq!(sys.to_dense().shape(), (12, 12));
    }

    #[test]
    fn test_word_line_block() {
        // 3 rows x 1 col: a single word-line ladder of three nodes.
        let net = network(3, 1);
        let w = conductances(3, 1);
        let a = assemble(&net, &w, &DVector::from_element(1, 0.2)).unwrap().block(Block::A);

        assert_relative_eq!(a[(0, 0)], w[(0, 0)] + 0.5 + 0.1);
        assert_relative_eq!(a[(1, 1)], w[(1, 0)] + 1.0);
        assert_relative_eq!(a[(2, 2)], w[(2, 0)] + 0.5 + FLOATING_CONDUCTANCE);
        assert_relative_eq!(a[(0, 1)], -0.5);
        assert_relative_eq!(a[(1, 0)], -0.5);
        assert_eq!(a[(0, 2)], 0.0);
    }

    #[test]
    fn test_bit_line_block_is_negated() {
        // 1 row x 3 cols: a single bit-line ladder of three nodes.
        let net = network(1, 3);
        let w = conductances(1, 3);
        let d = assemble(&net, &w, &DVector::from_element(3, 0.2)).unwrap().block(Block::D);

        assert_relative_eq!(d[(0, 0)], -(w[(0, 0)] + 0.25 + FLOATING_CONDUCTANCE));
        assert_relative_eq!(d[(1, 1)], -(w[(0, 1)] + 0.5));
        assert_relative_eq!(d[(2, 2)], -(w[(0, 2)] + 0.25 + 0.05));
        assert_relative_eq!(d[(1, 2)], 0.25);
    }

    #[test]
    fn test_coupling_blocks_mirror_each_other() {
        let net = network(2, 3);
        let w = conductances(2, 3);
        let sys = assemble(&net, &w, &DVector::from_element(3, 0.1)).unwrap();
        let (b, c) = (sys.block(Block::B), sys.block(Block::C));
        assert_eq!(b, -c.transpose());
        assert_relative_eq!(b[(net.word_line(1, 2), net.word_line(1, 2))], -w[(1, 2)]);
    }

    #[test]
    fn test_source_vector() {
        let net = network(2, 2)
            .with_bias(BiasConfig::uniform(2, 2, 0.0, 0.3, 0.0))
            .unwrap();
        let v = DVector::from_vec(vec![0.1, 0.2]);
        let sys = assemble(&net, &conductances(2, 2), &v).unwrap();

        assert_relative_eq!(sys.rhs[net.word_line(0, 0)], 0.1 * 0.1);
        assert_relative_eq!(sys.rhs[net.word_line(0, 1)], 0.2 * 0.1);
        assert_eq!(sys.rhs[net.word_line(1, 0)], 0.0);
        assert_relative_eq!(sys.rhs[net.bit_line(0, 1)], -0.3 * 0.05);
        assert_eq!(sys.rhs[net.bit_line(0, 0)], 0.0);
    }

    #[test]
    fn test_single_cell_has_no_ladder() {
        let net = network(1, 1);
        let w = DMatrix::from_element(1, 1, 1e-4);
        let m = assemble(&net, &w, &DVector::from_element(1, 0.2)).unwrap().to_dense();
        assert_relative_eq!(m[(0, 0)], 1e-4 + 0.1 + FLOATING_CONDUCTANCE);
        assert_relative_eq!(m[(1, 1)], -(1e-4 + FLOATING_CONDUCTANCE + 0.05));
    }

    #[test]
    fn test_shape_mismatch() {
        let net = network(2, 3);
        let err = assemble(&net, &conductances(2, 4), &DVector::zeros(3)).unwrap_err();
        assert!(matches!(err, CrossbarError::ShapeMismatch { .. }));

        let err = assemble(&net, &conductances(2, 3), &DVector::zeros(2)).unwrap_err();
        assert!(matches!(err, CrossbarError::ShapeMismatch { .. }));
    }
}
