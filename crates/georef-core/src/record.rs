//! Cave records, the usual source of the entrance coordinates.
//!
//! Records come one per line from a JSONL export of the cave registry.
//! Only the fields the georeferencing workflow needs are decoded; everything
//! else in a line is ignored.

use serde::{Deserialize, Serialize};

use crate::error::{GeorefError, GeorefResult};
use crate::GeoAnchor;

/// Graphics types that show the cave in plan view.
pub const PLAN_GRAPHICS_TYPES: [&str; 2] = ["plan", "plan i przekrój"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default)]
    pub graphics_type_name: Option<String>,
}

/// One scanned image attached to a cave.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaveImage {
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub metadata: ImageMetadata,
}

impl CaveImage {
    pub fn is_plan(&self) -> bool {
        self.metadata
            .graphics_type_name
            .as_deref()
            .is_some_and(|kind| PLAN_GRAPHICS_TYPES.contains(&kind))
    }

    /// File name part of `image_path`.
    pub fn file_name(&self) -> Option<&str> {
        let path = self.image_path.as_deref()?;
        path.rsplit(['/', '\\']).next().filter(|name| !name.is_empty())
    }
}

/// A cave as exported by the registry scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaveRecord {
    pub cave_id: String,
    pub name: String,
    #[serde(default)]
    pub inventory_number: String,
    /// WGS84; 0.0 when the registry has no position
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub images: Vec<CaveImage>,
}

impl CaveRecord {
    /// Decode one JSONL line.
    pub fn from_json_line(line: &str) -> GeorefResult<Self> {
        let record: CaveRecord = serde_json::from_str(line.trim())?;
        if record.cave_id.trim().is_empty() {
            return Err(GeorefError::Record("cave_id is empty".to_string()));
        }
        Ok(record)
    }

    pub fn anchor(&self) -> GeoAnchor {
        GeoAnchor::new(self.latitude, self.longitude)
    }

    /// Registry position, unless it is the (0, 0) placeholder.
    pub fn known_anchor(&self) -> Option<GeoAnchor> {
        let anchor = self.anchor();
        (!anchor.is_null_island()).then_some(anchor)
    }

    /// Images showing the cave in plan view, in record order.
    pub fn plan_images(&self) -> impl Iterator<Item = &CaveImage> {
        self.images.iter().filter(|image| image.is_plan())
    }

    /// Base name for generated files: `{cave_id}_{inventory number}`, with
    /// spaces in the inventory number replaced by underscores.
    pub fn output_base_name(&self) -> String {
        format!("{}_{}", self.cave_id, self.inventory_number.replace(' ', "_"))
    }
}

/// Find a cave by id in JSONL text.
///
/// Lines that fail to decode are skipped, as a registry export may contain
/// partial records.
pub fn find_in_jsonl(jsonl: &str, cave_id: &str) -> Option<CaveRecord> {
    jsonl
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match CaveRecord::from_json_line(line) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("skipping cave record: {e}");
                None
            }
        })
        .find(|record| record.cave_id == cave_id)
}
