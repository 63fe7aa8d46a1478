//! Georeference computation bindings.
//!
//! The UI serializes its whole state as a `CalibrationSession` object and
//! calls `compute_georeference` after every change. The result object holds
//! the transform, world file text, sidecar name and command text.

use georef_core::calibration::CalibrationSession;
use georef_core::overlay::render_ground_overlay;
use georef_core::GeoreferenceResult;
use wasm_bindgen::prelude::*;

use crate::calibration::role_name;

fn session_from_js(session: JsValue) -> Result<CalibrationSession, JsValue> {
    serde_wasm_bindgen::from_value(session)
        .map_err(|e| JsValue::from_str(&format!("Invalid session: {}", e)))
}

fn compute(session: &CalibrationSession) -> Result<GeoreferenceResult, String> {
    georef_core::compute_georeference(session).map_err(|e| e.to_string())
}

/// Compute the world file and commands for a session.
///
/// # Arguments
/// * `session` - A `CalibrationSession` object; missing fields take their
///   defaults (EPSG:2180, small-angle convergence, LZW, ...)
///
/// # Returns
/// The `GeoreferenceResult` object, or the error message to show the user.
///
/// # Example (TypeScript)
/// ```typescript
/// const result = compute_georeference({
///   points: store.to_js(),
///   anchor: { latitude: 49.23833, longitude: 19.90069 },
///   scale: { real_world_length_m: 50 },
///   image_name: "plan.jpg",
/// });
/// download(result.sidecar_name, result.world_file_text);
/// ```
#[wasm_bindgen]
pub fn compute_georeference(session: JsValue) -> Result<JsValue, JsValue> {
    let session = session_from_js(session)?;
    let result = compute(&session).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn overlay_kml(session: &CalibrationSession, name: &str, href: &str) -> Result<String, String> {
    let result = compute(session)?;
    let footprint = result
        .footprint
        .ok_or_else(|| "image dimensions are needed for a ground overlay".to_string())?;
    Ok(render_ground_overlay(name, href, &footprint))
}

/// KML `GroundOverlay` placing the georeferenced plan on a globe.
///
/// The session must carry `image_dimensions`. `href` is the file the KML
/// points at, usually the generated GeoTIFF.
#[wasm_bindgen]
pub fn ground_overlay_kml(session: JsValue, name: &str, href: &str) -> Result<String, JsValue> {
    let session = session_from_js(session)?;
    overlay_kml(&session, name, href).map_err(|e| JsValue::from_str(&e))
}

/// Names of the roles a session still lacks, honouring `use_north_arrow`.
#[wasm_bindgen]
pub fn session_missing_roles(session: JsValue) -> Result<js_sys::Array, JsValue> {
    let session = session_from_js(session)?;
    Ok(session
        .missing_roles()
        .into_iter()
        .map(|role| JsValue::from_str(role_name(role)))
        .collect())
}
