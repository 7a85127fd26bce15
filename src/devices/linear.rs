//! Ohmic memristor: I = g * V.
//!
//! Calibration leaves the conductance untouched, so the fitted conductance
//! equals the programmed one.

use super::Memristor;

/// A memristor with a perfectly linear read response.
#[derive(Debug, Clone)]
pub struct LinearMemristor {
    /// Programmed conductance (S)
    pub g0: f64,
}

impl Memristor for LinearMemristor {
    fn with_target(g0: f64) -> Self {
        Self { g0 }
    }

    fn calibrate(self, _temperature: f64, _frequency: f64) -> Self {
        self
    }

    fn fitted_conductance(&self) -> f64 {
        self.g0
    }

    fn inference(&self, voltage: f64) -> f64 {
        self.g0 * voltage
    }
}
