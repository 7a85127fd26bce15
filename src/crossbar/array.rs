//! Crossbar state: programmed devices and their conductance matrices.

use nalgebra::DMatrix;
use tracing::debug;

use super::network::Network;
use super::types::{BiasConfig, LineParams};
use super::validate::validate_geometry;
use crate::devices::{Device, DeviceModel, DeviceParams};
use crate::error::Result;

/// A rectangular crossbar of calibrated memristors.
///
/// Devices are programmed and calibrated once, at construction, and are
/// only read afterwards. Every multiply call rebuilds its own working state.
#[derive(Debug, Clone)]
pub struct Crossbar {
    /// Device model used for every cell
    pub model: DeviceModel,
    /// Calibration parameters applied to every cell
    pub device_params: DeviceParams,
    /// Ideal target conductances (rows x cols)
    ideal: DMatrix<f64>,
    /// Calibrated devices, row-major
    devices: Vec<Device>,
    /// Linear-fit conductance of each device (rows x cols)
    fitted: DMatrix<f64>,
    /// Line and terminal parameters
    network: Network,
}

impl Crossbar {
    /// Program and calibrate one device per entry of `ideal`.
    ///
    /// `ideal` is `rows x cols`: rows are bit lines (outputs), columns are
    /// word lines (inputs).
    pub fn new(
        model: DeviceModel,
        device_params: DeviceParams,
        ideal: DMatrix<f64>,
        lines: LineParams,
    ) -> Result<Self> {
        let (rows, cols) = ideal.shape();
        validate_geometry(rows, cols)?;
        device_params.validate()?;
        let network = Network::new(rows, cols, lines)?;

        let mut devices = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                devices.push(Device::program(model, &device_params, ideal[(i, j)])?);
            }
        }

        let fitted = DMatrix::from_fn(rows, cols, |i, j| devices[i * cols + j].fitted_conductance());

        debug!(
            rows,
            cols,
            model = %model,
            temperature = device_params.temperature,
            frequency = device_params.frequency,
            "programmed crossbar"
        );

        Ok(Self {
            model,
            device_params,
            ideal,
            devices,
            fitted,
            network,
        })
    }

    /// Like [`Crossbar::new`], selecting the device model by name.
    pub fn from_model_name(
        model: &str,
        device_params: DeviceParams,
        ideal: DMatrix<f64>,
        lines: LineParams,
    ) -> Result<Self> {
        Self::new(model.parse()?, device_params, ideal, lines)
    }

    /// Replace the bias on the non-signal terminals.
    pub fn with_bias(mut self, bias: BiasConfig) -> Result<Self> {
        self.network = self.network.with_bias(bias)?;
        Ok(self)
    }

    /// Number of rows (outputs).
    pub fn rows(&self) -> usize {
        self.network.rows
    }

    /// Number of columns (inputs).
    pub fn cols(&self) -> usize {
        self.network.cols
    }

    /// Ideal target conductance matrix.
    pub fn ideal_conductance(&self) -> &DMatrix<f64> {
        &self.ideal
    }

    /// Linear-fit conductance matrix of the calibrated devices.
    pub fn fitted_conductance(&self) -> &DMatrix<f64> {
        &self.fitted
    }

    /// Device at cell (row, col).
    pub fn device(&self, row: usize, col: usize) -> &Device {
        &self.devices[row * self.cols() + col]
    }

    /// Line, terminal and bias parameters.
    pub fn network(&self) -> &Network {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrossbarError;
    use approx::assert_relative_eq;

    fn ideal() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 3, &[1e-4, 2e-4, 5e-5, 3e-5, 1e-5, 2e-4])
    }

    #[test]
    fn test_one_device_per_cell() {
        let xbar = Crossbar::new(
            DeviceModel::Static,
            DeviceParams::default(),
            ideal(),
            LineParams::default(),
        )
        .unwrap();
        assert_eq!(xbar.rows(), 2);
        assert_eq!(xbar.cols(), 3);
        assert_eq!(xbar.fitted_conductance().shape(), (2, 3));
        assert_relative_eq!(
            xbar.fitted_conductance()[(1, 2)],
            xbar.device(1, 2).fitted_conductance()
        );
    }

    #[test]
    fn test_linear_devices_fit_their_target() {
        let xbar = Crossbar::new(
            DeviceModel::Linear,
            DeviceParams::default(),
            ideal(),
            LineParams::default(),
        )
        .unwrap();
        for (fit, target) in xbar.fitted_conductance().iter().zip(ideal().iter()) {
            assert_relative_eq!(*fit, *target);
        }
    }

    #[test]
    fn test_unknown_model_name() {
        let err = Crossbar::from_model_name(
            "ferroelectric",
            DeviceParams::default(),
            ideal(),
            LineParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CrossbarError::InvalidDeviceModel { .. }));
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let err = Crossbar::new(
            DeviceModel::Static,
            DeviceParams::default(),
            DMatrix::zeros(0, 3),
            LineParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CrossbarError::InvalidParameter { .. }));
    }
}
