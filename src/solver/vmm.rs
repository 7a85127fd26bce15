//! Vector-matrix multiply variants of increasing fidelity.

use std::fmt;
use std::str::FromStr;

use nalgebra::DVector;

use super::DEFAULT_ITERATIONS;
use crate::crossbar::{check_vector_len, Crossbar};
use crate::error::{CrossbarError, Result};

/// Which multiply model to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmmMode {
    /// Ideal target conductances, no device or line effects
    Ideal,
    /// Fitted (linearized) device conductances, no line effects
    Fitted,
    /// Nonlinear device response at the applied voltage, no line effects
    Device,
    /// Full line-resistance-aware solve with nonlinear refinement
    LineResistance { iterations: usize },
}

impl fmt::Display for VmmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmmMode::Ideal => write!(f, "ideal"),
            VmmMode::Fitted => write!(f, "fitted"),
            VmmMode::Device => write!(f, "device"),
            VmmMode::LineResistance { iterations } => write!(f, "lineres({})", iterations),
        }
    }
}

impl FromStr for VmmMode {
    type Err = CrossbarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ideal" => Ok(VmmMode::Ideal),
            "fitted" | "linear" => Ok(VmmMode::Fitted),
            "device" | "nonideal" => Ok(VmmMode::Device),
            "lineres" | "full" => Ok(VmmMode::LineResistance {
                iterations: DEFAULT_ITERATIONS,
            }),
            _ => Err(CrossbarError::invalid_parameter(
                "mode",
                format!("unknown multiply mode '{}' (expected ideal, fitted, device or lineres)", s),
            )),
        }
    }
}

impl Crossbar {
    /// Multiply by the ideal target conductance matrix.
    pub fn ideal_vmm(&self, v: &DVector<f64>) -> Result<DVector<f64>> {
        check_vector_len("input voltage vector", v, self.cols())?;
        Ok(self.ideal_conductance() * v)
    }

    /// Multiply by the fitted conductance matrix.
    pub fn fitted_vmm(&self, v: &DVector<f64>) -> Result<DVector<f64>> {
        check_vector_len("input voltage vector", v, self.cols())?;
        Ok(self.fitted_conductance() * v)
    }

    /// Sum each row of device currents at the directly applied voltages.
    pub fn device_vmm(&self, v: &DVector<f64>) -> Result<DVector<f64>> {
        check_vector_len("input voltage vector", v, self.cols())?;
        Ok(DVector::from_iterator(
            self.rows(),
            (0..self.rows()).map(|i| {
                (0..self.cols())
                    .map(|j| self.device(i, j).inference(v[j]))
                    .sum::<f64>()
            }),
        ))
    }

    /// Line-resistance-aware multiply with `iterations` nonlinear refinements.
    pub fn lineres_vmm(&self, v: &DVector<f64>, iterations: usize) -> Result<DVector<f64>> {
        Ok(self.refine(v, iterations)?.output)
    }

    /// Evaluate one multiply variant.
    pub fn vmm(&self, mode: VmmMode, v: &DVector<f64>) -> Result<DVector<f64>> {
        match mode {
            VmmMode::Ideal => self.ideal_vmm(v),
            VmmMode::Fitted => self.fitted_vmm(v),
            VmmMode::Device => self.device_vmm(v),
            VmmMode::LineResistance { iterations } => self.lineres_vmm(v, iterations),
        }
    }

    /// Evaluate one multiply variant for many independent inputs.
    ///
    /// With the `parallel` feature the inputs are spread across threads.
    pub fn vmm_batch(&self, mode: VmmMode, inputs: &[DVector<f64>]) -> Result<Vec<DVector<f64>>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            inputs.par_iter().map(|v| self.vmm(mode, v)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            inputs.iter().map(|v| self.vmm(mode, v)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossbar::LineParams;
    use crate::devices::{DeviceModel, DeviceParams};
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn crossbar(model: DeviceModel) -> Crossbar {
        let ideal = DMatrix::from_row_slice(2, 3, &[1e-4, 2e-4, 5e-5, 3e-5, 1e-5, 2e-4]);
        Crossbar::new(model, DeviceParams::default(), ideal, LineParams::default()).unwrap()
    }

    #[test]
    fn test_ideal_vmm() {
        let xbar = crossbar(DeviceModel::Static);
        let out = xbar.ideal_vmm(&DVector::from_vec(vec![0.1, 0.2, 0.3])).unwrap();
        assert_relative_eq!(out[0], 1e-5 + 4e-5 + 1.5e-5, max_relative = 1e-12);
        assert_relative_eq!(out[1], 3e-6 + 2e-6 + 6e-5, max_relative = 1e-12);
    }

    #[test]
    fn test_device_vmm_matches_fitted_for_linear_devices() {
        let xbar = crossbar(DeviceModel::Linear);
        let v = DVector::from_vec(vec![0.1, -0.2, 0.3]);
        let dev = xbar.device_vmm(&v).unwrap();
        let fit = xbar.fitted_vmm(&v).unwrap();
        for i in 0..2 {
            assert_relative_eq!(dev[i], fit[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn test_mode_dispatch() {
        let xbar = crossbar(DeviceModel::Static);
        let v = DVector::from_vec(vec![0.1, 0.2, 0.3]);
        assert_eq!(xbar.vmm(VmmMode::Ideal, &v).unwrap(), xbar.ideal_vmm(&v).unwrap());
        assert_eq!(
            xbar.vmm(VmmMode::LineResistance { iterations: 2 }, &v).unwrap(),
            xbar.lineres_vmm(&v, 2).unwrap()
        );
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("ideal".parse::<VmmMode>().unwrap(), VmmMode::Ideal);
        assert_eq!("Device".parse::<VmmMode>().unwrap(), VmmMode::Device);
        assert_eq!(
            "lineres".parse::<VmmMode>().unwrap(),
            VmmMode::LineResistance { iterations: DEFAULT_ITERATIONS }
        );
        assert!("quantum".parse::<VmmMode>().is_err());
    }

    #[test]
    fn test_batch_matches_single_calls() {
        let xbar = crossbar(DeviceModel::Dynamic);
        let inputs = vec![
            DVector::from_vec(vec![0.1, 0.0, 0.3]),
            DVector::from_vec(vec![0.4, 0.2, 0.1]),
        ];
        let mode = VmmMode::LineResistance { iterations: 1 };
        let batch = xbar.vmm_batch(mode, &inputs).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], xbar.vmm(mode, &inputs[1]).unwrap());
    }

    #[test]
    fn test_batch_propagates_shape_error() {
        let xbar = crossbar(DeviceModel::Static);
        let inputs = vec![DVector::zeros(3), DVector::zeros(4)];
        assert!(xbar.vmm_batch(VmmMode::Fitted, &inputs).is_err());
    }

    #[test]
    fn test_input_length_checked() {
        let xbar = crossbar(DeviceModel::Static);
        let v = DVector::zeros(2);
        assert!(matches!(xbar.ideal_vmm(&v), Err(CrossbarError::ShapeMismatch { .. })));
        assert!(matches!(xbar.device_vmm(&v), Err(CrossbarError::ShapeMismatch { .. })));
    }
}
