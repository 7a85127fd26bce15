//! Static memristor model.
//!
//! Uses a sinh-shaped conduction law:
//!   I = g * v_nl * sinh(V / v_nl)
//!
//! which is ohmic (I ≈ g*V) for |V| << v_nl and super-linear above it.
//! Calibration fixes two temperature dependent quantities:
//!   g    = g0 * (1 + TCR * (T - T_ref))
//!   v_nl = V_NL_REF * T / T_ref
//!
//! The read frequency has no effect on a static device.

use super::{fit_conductance, Memristor, T_REF};

/// Nonlinearity voltage at the reference temperature (V).
pub const V_NL_REF: f64 = 0.5;

/// Temperature coefficient of conductance (1/K).
pub const TCR: f64 = 2e-3;

/// Smallest allowed temperature scaling of the programmed conductance.
const MIN_THERMAL_SCALE: f64 = 0.1;

/// A static (state-retaining, frequency-independent) memristor.
#[derive(Debug, Clone)]
pub struct StaticMemristor {
    /// Programmed target conductance (S)
    pub g0: f64,
    /// Calibrated small-signal conductance (S)
    g: f64,
    /// Calibrated nonlinearity voltage (V)
    v_nl: f64,
    /// Linear-fit conductance of the calibrated response (S)
    g_linfit: f64,
}

impl StaticMemristor {
    /// Calibrated small-signal conductance.
    pub fn conductance(&self) -> f64 {
        self.g
    }

    /// Calibrated nonlinearity voltage.
    pub fn nonlinearity_voltage(&self) -> f64 {
        self.v_nl
    }

    fn response(g: f64, v_nl: f64, voltage: f64) -> f64 {
        g * v_nl * (voltage / v_nl).sinh()
    }
}

impl Memristor for StaticMemristor {
    fn with_target(g0: f64) -> Self {
        Self {
            g0,
            g: g0,
            v_nl: V_NL_REF,
            g_linfit: fit_conductance(|v| Self::response(g0, V_NL_REF, v)),
        }
    }

    fn calibrate(mut self, temperature: f64, _frequency: f64) -> Self {
        let thermal = (1.0 + TCR * (temperature - T_REF)).max(MIN_THERMAL_SCALE);
        self.g = self.g0 * thermal;
        self.v_nl = V_NL_REF * temperature / T_REF;
        let (g, v_nl) = (self.g, self.v_nl);
        self.g_linfit = fit_conductance(|v| Self::response(g, v_nl, v));
        self
    }

    fn fitted_conductance(&self) -> f64 {
        self.g_linfit
    }

    fn inference(&self, voltage: f64) -> f64 {
        Self::response(self.g, self.v_nl, voltage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn calibrated(g0: f64) -> StaticMemristor {
        StaticMemristor::with_target(g0).calibrate(T_REF, 1e3)
    }

    #[test]
    fn test_small_signal_is_ohmic() {
        let d = calibrated(1e-4);
        assert_relative_eq!(d.inference(1e-4) / 1e-4, 1e-4, max_relative = 1e-6);
    }

    #[test]
    fn test_response_is_odd_and_superlinear() {
        let d = calibrated(1e-4);
        assert_relative_eq!(d.inference(-0.3), -d.inference(0.3));
        assert!(d.inference(0.4) / 0.4 > d.inference(0.1) / 0.1);
    }

    #[test]
    fn test_fitted_conductance_between_small_and_large_signal() {
        let d = calibrated(1e-4);
        let g_fit = d.fitted_conductance();
        assert!(g_fit > d.conductance());
        assert!(g_fit < d.inference(0.4) / 0.4);
    }

    #[test]
    fn test_temperature_shifts_calibration() {
        let cold = StaticMemristor::with_target(1e-4).calibrate(250.0, 1e3);
        let hot = StaticMemristor::with_target(1e-4).calibrate(350.0, 1e3);
        assert!(hot.conductance() > cold.conductance());
        assert!(hot.nonlinearity_voltage() > cold.nonlinearity_voltage());
    }
}
