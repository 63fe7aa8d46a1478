//! Calibration point store bindings.
//!
//! The canvas UI keeps one `JsCalibrationStore` per plan and calls
//! `set_point` on every click. Roles are passed as their snake_case names:
//! `entrance`, `scale_start`, `scale_end`, `north_base`, `north_tip`.

use georef_core::calibration::{CalibrationPointStore, CalibrationRole, DisplayFrame};
use georef_core::ImageDimensions;
use wasm_bindgen::prelude::*;

/// Role for a snake_case name.
pub(crate) fn role_from_name(name: &str) -> Option<CalibrationRole> {
    CalibrationRole::ALL
        .into_iter()
        .find(|role| role_name(*role) == name.trim())
}

pub(crate) fn role_name(role: CalibrationRole) -> &'static str {
    match role {
        CalibrationRole::Entrance => "entrance",
        CalibrationRole::ScaleStart => "scale_start",
        CalibrationRole::ScaleEnd => "scale_end",
        CalibrationRole::NorthBase => "north_base",
        CalibrationRole::NorthTip => "north_tip",
    }
}

fn parse_role(name: &str) -> Result<CalibrationRole, JsValue> {
    role_from_name(name)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown calibration role: {name}")))
}

/// Calibration points wrapper for JavaScript
#[wasm_bindgen]
pub struct JsCalibrationStore {
    inner: CalibrationPointStore,
}

impl Default for JsCalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsCalibrationStore {
    /// Create an empty store
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CalibrationPointStore::new(),
        }
    }

    /// Mark a point in full-resolution pixel coordinates.
    ///
    /// Replaces any earlier point for the same role.
    pub fn set_point(&mut self, role: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let role = parse_role(role)?;
        self.inner.set_point(role, x, y);
        Ok(())
    }

    /// Mark a point clicked on a downscaled preview.
    ///
    /// # Arguments
    /// * `role` - Role name
    /// * `x`, `y` - Click position in preview pixels
    /// * `display_width`, `display_height` - Preview size
    /// * `full_width`, `full_height` - Full-resolution image size
    #[allow(clippy::too_many_arguments)]
    pub fn set_display_point(
        &mut self,
        role: &str,
        x: f64,
        y: f64,
        display_width: u32,
        display_height: u32,
        full_width: u32,
        full_height: u32,
    ) -> Result<(), JsValue> {
        let role = parse_role(role)?;
        let frame = DisplayFrame::new(
            ImageDimensions::new(display_width, display_height),
            ImageDimensions::new(full_width, full_height),
        );
        self.inner
            .set_display_point(role, x, y, &frame)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Remove the point for a role, returning whether one was set
    pub fn remove(&mut self, role: &str) -> Result<bool, JsValue> {
        let role = parse_role(role)?;
        Ok(self.inner.remove(role).is_some())
    }

    /// Remove all points
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Number of marked points
    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if no point is marked
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Check whether every needed role is marked
    pub fn is_complete(&self, require_north_arrow: bool) -> bool {
        self.inner.is_complete(require_north_arrow)
    }

    /// Names of the roles still to be marked, in marking order
    pub fn missing_roles(&self, require_north_arrow: bool) -> js_sys::Array {
        self.missing_role_names(require_north_arrow)
            .into_iter()
            .map(JsValue::from_str)
            .collect()
    }

    /// `[x, y]` of a role's point, or `undefined` when unmarked
    pub fn get(&self, role: &str) -> Result<Option<Vec<f64>>, JsValue> {
        let role = parse_role(role)?;
        Ok(self.inner.get(role).map(|p| vec![p.x, p.y]))
    }

    /// Points as `[{ role, x, y }]`, the form `CalibrationSession.points`
    /// expects
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsCalibrationStore {
    pub(crate) fn missing_role_names(&self, require_north_arrow: bool) -> Vec<&'static str> {
        self.inner
            .missing_roles(require_north_arrow)
            .into_iter()
            .map(role_name)
            .collect()
    }

    pub fn inner(&self) -> &CalibrationPointStore {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip() {
        for role in CalibrationRole::ALL {
            assert_eq!(role_from_name(role_name(role)), Some(role));
        }
        assert_eq!(role_from_name("north"), None);
    }

    #[test]
    fn test_store_flow() {
        let mut store = JsCalibrationStore::new();
        assert_eq!(store.len(), 0);
        assert_eq!(
            store.missing_role_names(false),
            vec!["entrance", "scale_start", "scale_end"]
        );

        store.set_point("entrance", 10.0, 20.0).unwrap();
        store.set_point("scale_start", 0.0, 0.0).unwrap();
        store.set_point("scale_end", 100.0, 0.0).unwrap();
        assert!(store.is_complete(false));
        assert!(!store.is_complete(true));
        assert_eq!(
            store.missing_role_names(true),
            vec!["north_base", "north_tip"]
        );

        store.set_point("entrance", 11.0, 21.0).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("entrance").unwrap(), Some(vec![11.0, 21.0]));

        assert!(store.remove("scale_end").unwrap());
        assert!(!store.is_complete(false));

        store.clear();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_display_point_scaled() {
        let mut store = JsCalibrationStore::new();
        store
            .set_display_point("entrance", 100.0, 50.0, 1000, 500, 4000, 2000)
            .unwrap();
        assert_eq!(store.get("entrance").unwrap(), Some(vec![400.0, 200.0]));
    }
}
