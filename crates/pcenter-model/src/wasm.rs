//! WASM bindings for the p-center model generator
//!
//! Instances are passed as plain JS objects
//! `{ cost: number[][], demand: number[], capacity: number[], p: number }`.

use wasm_bindgen::prelude::*;

use crate::assembler::Assembler;
use crate::inspect;
use crate::instance::Instance;

/// Build the LP document for an instance
#[wasm_bindgen]
pub fn generate_lp(instance: JsValue) -> Result<String, JsValue> {
    let instance: Instance =
        serde_wasm_bindgen::from_value(instance).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Assembler::new(&instance)
        .to_lp_string()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Recover `n`, `p` and section counts from an LP document
#[wasm_bindgen]
pub fn inspect_lp(source: &str) -> Result<JsValue, JsValue> {
    let stats = inspect::inspect_lp(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&stats).map_err(|e| JsValue::from_str(&e.to_string()))
}
