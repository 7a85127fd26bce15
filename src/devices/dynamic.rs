//! Dynamic memristor model.
//!
//! Extends the static sinh law with two read-frequency effects:
//!   I = g_f * v_nl * sinh(V / v_nl) * (1 + a_f * tanh(V / v_nl))
//!
//! where
//!   g_f = g0 * (1 + TCR * (T - T_ref)) * (1 + DISPERSION * ln(f / f_ref))
//!   a_f = ASYMMETRY_REF / (1 + f / F_CORNER)
//!
//! Slow reads let the filament relax, which shows up as a polarity
//! asymmetry that fades above the corner frequency.

use super::static_model::{TCR, V_NL_REF};
use super::{fit_conductance, Memristor, F_REF, T_REF};

/// Relative conductance change per natural-log decade of frequency.
pub const DISPERSION: f64 = 0.01;

/// Polarity asymmetry at low frequency.
pub const ASYMMETRY_REF: f64 = 0.1;

/// Frequency above which the asymmetry fades (Hz).
pub const F_CORNER: f64 = 1e5;

/// Smallest allowed scaling of the programmed conductance.
const MIN_SCALE: f64 = 0.1;

/// A dynamic (frequency dependent) memristor.
#[derive(Debug, Clone)]
pub struct DynamicMemristor {
    /// Programmed target conductance (S)
    pub g0: f64,
    g: f64,
    v_nl: f64,
    asymmetry: f64,
    g_linfit: f64,
}

impl DynamicMemristor {
    /// Calibrated small-signal conductance.
    pub fn conductance(&self) -> f64 {
        self.g
    }

    /// Calibrated polarity asymmetry factor.
    pub fn asymmetry(&self) -> f64 {
        self.asymmetry
    }

    fn response(g: f64, v_nl: f64, asymmetry: f64, voltage: f64) -> f64 {
        let x = voltage / v_nl;
        g * v_nl * x.sinh() * (1.0 + asymmetry * x.tanh())
    }
}

impl Memristor for DynamicMemristor {
    fn with_target(g0: f64) -> Self {
        Self {
            g0,
            g: g0,
            v_nl: V_NL_REF,
            asymmetry: ASYMMETRY_REF,
            g_linfit: fit_conductance(|v| Self::response(g0, V_NL_REF, ASYMMETRY_REF, v)),
        }
    }

    fn calibrate(mut self, temperature: f64, frequency: f64) -> Self {
        let thermal = 1.0 + TCR * (temperature - T_REF);
        let dispersion = 1.0 + DISPERSION * (frequency / F_REF).ln();
        self.g = self.g0 * (thermal * dispersion).max(MIN_SCALE);
        self.v_nl = V_NL_REF * temperature / T_REF;
        self.asymmetry = ASYMMETRY_REF / (1.0 + frequency / F_CORNER);

        let (g, v_nl, a) = (self.g, self.v_nl, self.asymmetry);
        self.g_linfit = fit_conductance(|v| Self::response(g, v_nl, a, v));
        self
    }

    fn fitted_conductance(&self) -> f64 {
        self.g_linfit
    }

    fn inference(&self, voltage: f64) -> f64 {
        Self::response(self.g, self.v_nl, self.asymmetry, voltage)
    }
}
