//! World file bindings.

use georef_core::affine::AffineTransform;
use georef_core::worldfile::{self, WorldFile, WorldFilePrecision};
use wasm_bindgen::prelude::*;

/// Sidecar extension for an image extension (`"jpg"` -> `"jgw"`).
#[wasm_bindgen]
pub fn world_file_extension(image_extension: &str) -> Result<String, JsValue> {
    worldfile::world_file_extension(image_extension)
        .map(str::to_string)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sidecar extension for an uploaded file, detected from its header bytes.
///
/// # Example (TypeScript)
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const ext = detect_world_file_extension(bytes); // "jgw"
/// ```
#[wasm_bindgen]
pub fn detect_world_file_extension(bytes: &[u8]) -> Result<String, JsValue> {
    worldfile::world_file_extension_for_bytes(bytes)
        .map(str::to_string)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sidecar file name for an image file name (`plan.png` -> `plan.pgw`).
#[wasm_bindgen]
pub fn sidecar_file_name(image_file_name: &str) -> Result<String, JsValue> {
    worldfile::sidecar_file_name(image_file_name).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// World file names to look for next to an image, in lookup order.
#[wasm_bindgen]
pub fn sidecar_candidates(image_file_name: &str) -> Vec<String> {
    worldfile::sidecar_candidates(image_file_name)
}

/// Read a world file back into its six coefficients.
///
/// # Returns
/// `[A, D, B, E, C, F]`, the line order of the file.
#[wasm_bindgen]
pub fn parse_world_file(text: &str) -> Result<Vec<f64>, JsValue> {
    WorldFile::parse(text)
        .map(|wf| wf.transform.world_file_order().to_vec())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn render(coefficients: &[f64], significant_digits: u32) -> Result<String, String> {
    let [a, d, b, e, c, f] = <[f64; 6]>::try_from(coefficients)
        .map_err(|_| format!("expected 6 coefficients, got {}", coefficients.len()))?;
    let transform =
        AffineTransform::from_coefficients(a, b, c, d, e, f).map_err(|err| err.to_string())?;
    Ok(worldfile::render_world_file(
        &transform,
        WorldFilePrecision { significant_digits },
    ))
}

/// Render `[A, D, B, E, C, F]` as world file text.
#[wasm_bindgen]
pub fn render_world_file(coefficients: &[f64], significant_digits: u32) -> Result<String, JsValue> {
    render(coefficients, significant_digits).map_err(|e| JsValue::from_str(&e))
}
