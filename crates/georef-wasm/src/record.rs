//! Cave record bindings, used to prefill the entrance coordinates and the
//! output file names.

use georef_core::record::{find_in_jsonl, CaveRecord};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// What the UI needs from a cave record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsCaveSummary {
    pub cave_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `false` for the (0, 0) placeholder
    pub has_coordinates: bool,
    pub output_base_name: String,
    /// File names of the plan-view images
    pub plan_images: Vec<String>,
}

impl From<&CaveRecord> for JsCaveSummary {
    fn from(record: &CaveRecord) -> Self {
        let anchor = record.anchor();
        Self {
            cave_id: record.cave_id.clone(),
            name: record.name.clone(),
            latitude: anchor.latitude,
            longitude: anchor.longitude,
            has_coordinates: record.known_anchor().is_some(),
            output_base_name: record.output_base_name(),
            plan_images: record
                .plan_images()
                .filter_map(|image| image.file_name())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Summarize one JSONL line of the cave registry export.
#[wasm_bindgen]
pub fn parse_cave_record(line: &str) -> Result<JsValue, JsValue> {
    let record = CaveRecord::from_json_line(line).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&JsCaveSummary::from(&record))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Find a cave by id in a JSONL export; `undefined` when absent.
#[wasm_bindgen]
pub fn find_cave_record(jsonl: &str, cave_id: &str) -> Result<JsValue, JsValue> {
    match find_in_jsonl(jsonl, cave_id) {
        Some(record) => serde_wasm_bindgen::to_value(&JsCaveSummary::from(&record))
            .map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok(JsValue::UNDEFINED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let record = CaveRecord::from_json_line(
            r#"{"cave_id": "000390", "name": "Mylna", "inventory_number": "T.E-12 a", "latitude": 49.2, "longitude": 19.9,
                "images": [{"image_path": "x/000390/p1.jpg", "metadata": {"graphics_type_name": "plan"}},
                           {"image_path": "x/000390/s1.jpg", "metadata": {"graphics_type_name": "przekrój"}}]}"#,
        )
        .unwrap();
        let summary = JsCaveSummary::from(&record);
        assert_eq!(summary.output_base_name, "000390_T.E-12_a");
        assert_eq!(summary.plan_images, vec!["p1.jpg"]);
        assert!(summary.has_coordinates);
    }
}
