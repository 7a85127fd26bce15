//! Fixed-point refinement against the nonlinear device response.
//!
//! Each iteration reads the voltage drop across every device from the
//! previous solve, asks the device for its actual current at that drop,
//! and uses `I / ΔV` as the cell's conductance for the next solve. The
//! iteration count is the only termination criterion.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use super::assembly::assemble;
use super::linear::{solve, SolveCache};
use crate::crossbar::{check_vector_len, Crossbar, Network, NodeIndex};
use crate::error::Result;

/// Solved node voltages of a crossbar.
#[derive(Debug, Clone)]
pub struct NodeVoltages {
    rows: usize,
    cols: usize,
    values: DVector<f64>,
}

impl NodeVoltages {
    /// Wrap a raw solution vector of a `rows x cols` array.
    pub fn new(rows: usize, cols: usize, values: DVector<f64>) -> Result<Self> {
        check_vector_len("node-voltage vector", &values, 2 * rows * cols)?;
        Ok(Self { rows, cols, values })
    }

    /// Voltage at the given node.
    pub fn get(&self, node: NodeIndex) -> f64 {
        self.values[node.to_index(self.rows, self.cols)]
    }

    /// Word-line side voltage of cell (row, col).
    pub fn word_line(&self, row: usize, col: usize) -> f64 {
        self.get(NodeIndex::WordLine { row, col })
    }

    /// Bit-line side voltage of cell (row, col).
    pub fn bit_line(&self, row: usize, col: usize) -> f64 {
        self.get(NodeIndex::BitLine { row, col })
    }

    /// Voltage across every device, word line minus bit line (rows x cols).
    pub fn drops(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.rows, self.cols, |i, j| {
            self.word_line(i, j) - self.bit_line(i, j)
        })
    }

    /// Raw solution vector in solver layout.
    pub fn as_vector(&self) -> &DVector<f64> {
        &self.values
    }
}

/// Result of a line-resistance-aware multiply.
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    /// Node voltages of the final solve
    pub voltages: NodeVoltages,
    /// Working conductance used for the final solve (rows x cols)
    pub conductance: DMatrix<f64>,
    /// Current through every device (rows x cols)
    pub cell_currents: DMatrix<f64>,
    /// Row sums of the cell currents
    pub output: DVector<f64>,
    /// Number of refinement iterations performed
    pub iterations: usize,
}

/// Assemble and solve the network for conductances `w`.
pub fn solve_voltages(
    network: &Network,
    w: &DMatrix<f64>,
    v_applied: &DVector<f64>,
    cache: Option<&mut SolveCache>,
) -> Result<NodeVoltages> {
    let system = assemble(network, w, v_applied)?;
    let values = solve(&system, cache)?;
    NodeVoltages::new(network.rows, network.cols, values)
}

impl Crossbar {
    /// Line-resistance-aware solve with `iterations` nonlinear refinements.
    ///
    /// `iterations = 0` solves once with the fitted conductances.
    pub fn refine(&self, v_applied: &DVector<f64>, iterations: usize) -> Result<RefineOutcome> {
        self.refine_with_cache(v_applied, iterations, None)
    }

    /// Like [`Crossbar::refine`], recording the last inverted matrix in `cache`.
    pub fn refine_with_cache(
        &self,
        v_applied: &DVector<f64>,
        iterations: usize,
        mut cache: Option<&mut SolveCache>,
    ) -> Result<RefineOutcome> {
        let network = self.network();
        check_vector_len("applied voltage vector", v_applied, network.cols)?;

        let mut w = self.fitted_conductance().clone();
        let mut voltages = solve_voltages(network, &w, v_applied, cache.as_deref_mut())?;

        for iteration in 0..iterations {
            let (kept, max_change) = self.update_conductance(&voltages, &mut w);
            if kept > 0 {
                debug!(iteration, cells = kept, "zero voltage drop, keeping previous conductance");
            }
            trace!(iteration, max_change, "refined working conductance");

            voltages = solve_voltages(network, &w, v_applied, cache.as_deref_mut())?;
        }

        let cell_currents = voltages.drops().component_mul(&w);
        let output = DVector::from_iterator(
            network.rows,
            (0..network.rows).map(|i| cell_currents.row(i).sum()),
        );

        Ok(RefineOutcome {
            voltages,
            conductance: w,
            cell_currents,
            output,
            iterations,
        })
    }

    /// Re-derive every cell's conductance at its local voltage drop.
    ///
    /// Returns the number of cells that kept their conductance and the
    /// largest absolute conductance change.
    fn update_conductance(&self, voltages: &NodeVoltages, w: &mut DMatrix<f64>) -> (usize, f64) {
        let drops = voltages.drops();
        let mut kept = 0;
        let mut max_change = 0.0f64;

        for i in 0..self.rows() {
            for j in 0..self.cols() {
                match local_conductance(self, i, j, drops[(i, j)]) {
                    Some(g) => {
                        max_change = max_change.max((g - w[(i, j)]).abs());
                        w[(i, j)] = g;
                    }
                    None => kept += 1,
                }
            }
        }

        (kept, max_change)
    }
}

/// Conductance `I(ΔV) / ΔV` of cell (row, col); `None` for a zero drop.
fn local_conductance(crossbar: &Crossbar, row: usize, col: usize, drop: f64) -> Option<f64> {
    if drop == 0.0 {
        return None;
    }
    let g = crossbar.device(row, col).inference(drop) / drop;
    g.is_finite().then_some(g)
}
