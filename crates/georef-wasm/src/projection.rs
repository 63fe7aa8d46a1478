//! Projection bindings: the built-in table, input resolution and point
//! projection for the UI's coordinate readouts.

use georef_core::projection::{
    CoordinateProjector, ProjectionDefinition, Projector, KNOWN_PROJECTIONS,
};
use georef_core::{GeoAnchor, ProjectedPoint};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// One entry of the projection picker.
#[derive(Debug, Clone, Serialize)]
pub struct JsKnownProjection {
    pub identifier: String,
    pub name: &'static str,
    pub central_meridian_deg: f64,
}

fn known_projection_list() -> Vec<JsKnownProjection> {
    KNOWN_PROJECTIONS
        .iter()
        .map(|p| JsKnownProjection {
            identifier: p.identifier(),
            name: p.name,
            central_meridian_deg: p.central_meridian_deg,
        })
        .collect()
}

fn projector_for(projection: &str) -> Result<CoordinateProjector, JsValue> {
    ProjectionDefinition::from_identifier(projection)
        .and_then(|definition| CoordinateProjector::from_definition(&definition))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Built-in projections as `[{ identifier, name, central_meridian_deg }]`.
#[wasm_bindgen]
pub fn known_projections() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&known_projection_list())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resolve the projection field into a `ProjectionDefinition` object.
#[wasm_bindgen]
pub fn resolve_projection(input: &str) -> Result<JsValue, JsValue> {
    let definition = ProjectionDefinition::from_identifier(input)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&definition).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Project a WGS84 position, returning `[easting, northing]`.
#[wasm_bindgen]
pub fn project_point(
    latitude: f64,
    longitude: f64,
    projection: &str,
) -> Result<Vec<f64>, JsValue> {
    let projector = projector_for(projection)?;
    let p = projector
        .project(GeoAnchor::new(latitude, longitude))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(vec![p.easting, p.northing])
}

/// Inverse of `project_point`, returning `[latitude, longitude]`.
#[wasm_bindgen]
pub fn unproject_point(
    easting: f64,
    northing: f64,
    projection: &str,
) -> Result<Vec<f64>, JsValue> {
    let projector = projector_for(projection)?;
    let g = projector
        .unproject(ProjectedPoint::new(easting, northing))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(vec![g.latitude, g.longitude])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_projection_list() {
        let list = known_projection_list();
        assert_eq!(list[0].identifier, "EPSG:2180");
        assert!(list.iter().any(|p| p.identifier == "EPSG:32634"));
    }

    #[test]
    fn test_project_and_back() {
        let p = project_point(49.23833, 19.90069, "EPSG:2180").unwrap();
        assert!((p[0] - 565_543.769).abs() < 1.0);
        let g = unproject_point(p[0], p[1], "EPSG:2180").unwrap();
        assert!((g[0] - 49.23833).abs() < 1e-8);
        assert!((g[1] - 19.90069).abs() < 1e-8);
    }
}
