//! WASM bindings for Crossbar Core.
//!
//! This module provides JavaScript-friendly bindings for evaluating crossbar
//! multiplies in the browser.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCrossbar } from 'crossbar_core';
//!
//! await init();
//!
//! const description = `
//!   .device static
//!   .lines r_wl=2.5 r_bl=2.5
//!   .row 100u 20u
//!   .row 50u 300u
//! `;
//!
//! const xbar = new WasmCrossbar(description);
//! const out = xbar.lineres_vmm(new Float64Array([0.2, 0.1]), 1);
//! ```

use nalgebra::DVector;
use wasm_bindgen::prelude::*;

use crate::config;
use crate::crossbar::Crossbar;
use crate::error::{CrossbarError, Result};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: CrossbarError) -> JsValue {
    let err = match err {
        e @ CrossbarError::WasmError { .. } => e,
        e => CrossbarError::WasmError {
            message: e.to_string(),
        },
    };
    JsValue::from_str(&err.to_string())
}

fn output(result: Result<DVector<f64>>) -> std::result::Result<Vec<f64>, JsValue> {
    result.map(|v| v.iter().copied().collect()).map_err(to_js)
}

/// WASM-compatible crossbar simulator.
///
/// Wraps a native [`Crossbar`] and exposes its multiply variants over plain
/// `f64` arrays.
#[wasm_bindgen]
pub struct WasmCrossbar {
    crossbar: Crossbar,
}

#[wasm_bindgen]
impl WasmCrossbar {
    /// Create a new crossbar from description text.
    ///
    /// # Arguments
    /// * `description` - The crossbar in description format
    #[wasm_bindgen(constructor)]
    pub fn new(description: &str) -> std::result::Result<WasmCrossbar, JsValue> {
        let crossbar = config::parse(description)
            .and_then(|c| c.build())
            .map_err(to_js)?;
        Ok(WasmCrossbar { crossbar })
    }

    /// Number of rows (outputs).
    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> usize {
        self.crossbar.rows()
    }

    /// Number of columns (inputs).
    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> usize {
        self.crossbar.cols()
    }

    /// Multiply by the ideal conductance matrix.
    #[wasm_bindgen]
    pub fn ideal_vmm(&self, input: &[f64]) -> std::result::Result<Vec<f64>, JsValue> {
        output(self.crossbar.ideal_vmm(&DVector::from_column_slice(input)))
    }

    /// Multiply by the fitted conductance matrix.
    #[wasm_bindgen]
    pub fn fitted_vmm(&self, input: &[f64]) -> std::result::Result<Vec<f64>, JsValue> {
        output(self.crossbar.fitted_vmm(&DVector::from_column_slice(input)))
    }

    /// Sum device currents at the applied voltages, ignoring line resistance.
    #[wasm_bindgen]
    pub fn device_vmm(&self, input: &[f64]) -> std::result::Result<Vec<f64>, JsValue> {
        output(self.crossbar.device_vmm(&DVector::from_column_slice(input)))
    }

    /// Full line-resistance-aware multiply.
    ///
    /// # Arguments
    /// * `input` - Applied word-line voltages
    /// * `iterations` - Nonlinear refinement iterations (1 is first order)
    #[wasm_bindgen]
    pub fn lineres_vmm(
        &self,
        input: &[f64],
        iterations: usize,
    ) -> std::result::Result<Vec<f64>, JsValue> {
        output(
            self.crossbar
                .lineres_vmm(&DVector::from_column_slice(input), iterations),
        )
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
