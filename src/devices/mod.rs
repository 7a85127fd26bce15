//! Memristor device models.
//!
//! The crossbar only needs two things from a device: a calibration step that
//! fixes its response for a given temperature and read frequency, and an
//! inference query that maps an applied voltage to a current. Every model
//! implements [`Memristor`]; the [`Device`] enum dispatches over the
//! supported variants so the circuit code never branches on model identity.
//!
//! - [`StaticMemristor`] - sinh-shaped I-V curve, temperature dependent
//! - [`DynamicMemristor`] - static response plus frequency dispersion and
//!   polarity asymmetry
//! - [`LinearMemristor`] - ohmic device, nonlinearity disabled

mod dynamic;
mod linear;
mod static_model;

pub use dynamic::DynamicMemristor;
pub use linear::LinearMemristor;
pub use static_model::StaticMemristor;

use std::fmt;
use std::str::FromStr;

use crate::error::{CrossbarError, Result};

/// Lower bound of the programmable conductance range (S).
pub const G_MIN: f64 = 3.16e-6;

/// Upper bound of the programmable conductance range (S).
pub const G_MAX: f64 = 316e-6;

/// Half-width of the valid inference voltage range (V).
pub const V_READ_MAX: f64 = 0.4;

/// Reference temperature for calibration (K).
pub const T_REF: f64 = 300.0;

/// Reference read frequency for calibration (Hz).
pub const F_REF: f64 = 1e3;

/// Number of sample points used for the linear fit.
const FIT_POINTS: usize = 81;

/// Capability shared by every device model.
pub trait Memristor {
    /// Program a fresh, uncalibrated device toward a target conductance.
    fn with_target(g0: f64) -> Self
    where
        Self: Sized;

    /// Fix the device response for the given temperature (K) and frequency (Hz).
    fn calibrate(self, temperature: f64, frequency: f64) -> Self
    where
        Self: Sized;

    /// Best linear-fit conductance of the calibrated response.
    fn fitted_conductance(&self) -> f64;

    /// Current through the device at the given voltage.
    fn inference(&self, voltage: f64) -> f64;
}

/// Least-squares slope through the origin of `response` over the read range.
pub(crate) fn fit_conductance(response: impl Fn(f64) -> f64) -> f64 {
    let step = 2.0 * V_READ_MAX / (FIT_POINTS - 1) as f64;
    let (num, den) = (0..FIT_POINTS)
        .map(|k| -V_READ_MAX + k as f64 * step)
        .fold((0.0, 0.0), |(num, den), v| (num + v * response(v), den + v * v));
    num / den
}

/// Supported device model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceModel {
    #[default]
    Static,
    Dynamic,
    Linear,
}

impl DeviceModel {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceModel::Static => "static",
            DeviceModel::Dynamic => "dynamic",
            DeviceModel::Linear => "linear",
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceModel {
    type Err = CrossbarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "static" | "staticmemristor" => Ok(DeviceModel::Static),
            "dynamic" | "dynamicmemristor" => Ok(DeviceModel::Dynamic),
            "linear" | "ohmic" => Ok(DeviceModel::Linear),
            _ => Err(CrossbarError::InvalidDeviceModel {
                model: s.to_string(),
            }),
        }
    }
}

/// Calibration parameters shared by all devices of a crossbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceParams {
    /// Operating temperature in kelvin
    pub temperature: f64,
    /// Read frequency in hertz
    pub frequency: f64,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            temperature: T_REF,
            frequency: F_REF,
        }
    }
}

impl DeviceParams {
    /// Create calibration parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operating temperature (K).
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the read frequency (Hz).
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Check that both parameters are positive and finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(CrossbarError::invalid_parameter(
                "temperature",
                format!("must be positive, got {}", self.temperature),
            ));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(CrossbarError::invalid_parameter(
                "frequency",
                format!("must be positive, got {}", self.frequency),
            ));
        }
        Ok(())
    }
}

/// A calibrated crossbar cell.
#[derive(Debug, Clone)]
pub enum Device {
    Static(StaticMemristor),
    Dynamic(DynamicMemristor),
    Linear(LinearMemristor),
}

impl Device {
    /// Program a device of the given model toward `g0`, then calibrate it.
    ///
    /// Targets outside the programmable range are clamped into it; negative
    /// or non-finite targets are rejected.
    pub fn program(model: DeviceModel, params: &DeviceParams, g0: f64) -> Result<Self> {
        if !g0.is_finite() || g0 < 0.0 {
            return Err(CrossbarError::invalid_parameter(
                "conductance",
                format!("target must be a non-negative real, got {}", g0),
            ));
        }
        let g0 = g0.clamp(G_MIN, G_MAX);
        let (t, f) = (params.temperature, params.frequency);

        Ok(match model {
            DeviceModel::Static => Device::Static(StaticMemristor::with_target(g0).calibrate(t, f)),
            DeviceModel::Dynamic => {
                Device::Dynamic(DynamicMemristor::with_target(g0).calibrate(t, f))
            }
            DeviceModel::Linear => Device::Linear(LinearMemristor::with_target(g0).calibrate(t, f)),
        })
    }

    /// The model this device was built from.
    pub fn model(&self) -> DeviceModel {
        match self {
            Device::Static(_) => DeviceModel::Static,
            Device::Dynamic(_) => DeviceModel::Dynamic,
            Device::Linear(_) => DeviceModel::Linear,
        }
    }

    /// Best linear-fit conductance of the calibrated device.
    pub fn fitted_conductance(&self) -> f64 {
        match self {
            Device::Static(d) => d.fitted_conductance(),
            Device::Dynamic(d) => d.fitted_conductance(),
            Device::Linear(d) => d.fitted_conductance(),
        }
    }

    /// Current through the device at the given voltage.
    pub fn inference(&self, voltage: f64) -> f64 {
        match self {
            Device::Static(d) => d.inference(voltage),
            Device::Dynamic(d) => d.inference(voltage),
            Device::Linear(d) => d.inference(voltage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_model_from_str() {
        assert_eq!("static".parse::<DeviceModel>().unwrap(), DeviceModel::Static);
        assert_eq!("Dynamic".parse::<DeviceModel>().unwrap(), DeviceModel::Dynamic);
        assert_eq!("LINEAR".parse::<DeviceModel>().unwrap(), DeviceModel::Linear);
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = "pcm".parse::<DeviceModel>().unwrap_err();
        assert!(matches!(err, CrossbarError::InvalidDeviceModel { ref model } if model == "pcm"));
    }

    #[test]
    fn test_fit_of_ohmic_response_is_exact() {
        assert_relative_eq!(fit_conductance(|v| 5e-5 * v), 5e-5, max_relative = 1e-12);
    }

    #[test]
    fn test_program_clamps_target() {
        let params = DeviceParams::default();
        let low = Device::program(DeviceModel::Linear, &params, 0.0).unwrap();
        let high = Device::program(DeviceModel::Linear, &params, 1.0).unwrap();
        assert_relative_eq!(low.fitted_conductance(), G_MIN);
        assert_relative_eq!(high.fitted_conductance(), G_MAX);
    }

    #[test]
    fn test_program_rejects_negative_target() {
        let params = DeviceParams::default();
        assert!(Device::program(DeviceModel::Static, &params, -1e-5).is_err());
        assert!(Device::program(DeviceModel::Static, &params, f64::NAN).is_err());
    }

    #[test]
    fn test_params_validation() {
        assert!(DeviceParams::default().validate().is_ok());
        assert!(DeviceParams::new().with_temperature(0.0).validate().is_err());
        assert!(DeviceParams::new().with_frequency(-1.0).validate().is_err());
    }

    #[test]
    fn test_device_reports_model() {
        let params = DeviceParams::default();
        let d = Device::program(DeviceModel::Dynamic, &params, 1e-4).unwrap();
        assert_eq!(d.model(), DeviceModel::Dynamic);
    }
}
