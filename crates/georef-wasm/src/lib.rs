//! Georef WASM - WebAssembly bindings for the cave plan georeferencing engine
//!
//! The interactive canvas UI owns all state. It calls into this crate on
//! every change and shows whatever comes back; errors arrive as strings that
//! can be displayed as-is.
//!
//! # Module Structure
//!
//! - `calibration` - Point store for the marked calibration points
//! - `georeference` - Full computation from a session object
//! - `worldfile` - Sidecar naming, rendering and parsing
//! - `command` - GDAL / ImageMagick command text
//! - `projection` - Built-in projections and point projection
//! - `record` - Cave registry records (entrance coordinates, file names)
//! - `logging` - Console logger for engine diagnostics
//!
//! # Usage
//!
//! ```typescript
//! import init, { init_logging, JsCalibrationStore, compute_georeference } from '@cave-georef/wasm';
//!
//! await init();
//! init_logging("info");
//!
//! const store = new JsCalibrationStore();
//! store.set_point("entrance", 1200, 800);
//! store.set_point("scale_start", 100, 3000);
//! store.set_point("scale_end", 600, 3000);
//!
//! const result = compute_georeference({
//!   points: store.to_js(),
//!   anchor: { latitude: 49.23833, longitude: 19.90069 },
//!   scale: { real_world_length_m: 50 },
//!   image_name: "plan.jpg",
//! });
//! ```

use wasm_bindgen::prelude::*;

mod calibration;
mod command;
mod georeference;
mod logging;
mod projection;
mod record;
mod worldfile;

// Re-export public types
pub use calibration::JsCalibrationStore;
pub use command::generate_commands;
pub use georeference::{compute_georeference, ground_overlay_kml, session_missing_roles};
pub use logging::init_logging;
pub use projection::{known_projections, project_point, resolve_projection, unproject_point};
pub use record::{find_cave_record, parse_cave_record};
pub use worldfile::{
    detect_world_file_extension, parse_world_file, render_world_file, sidecar_candidates,
    sidecar_file_name, world_file_extension,
};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Logging stays off until the page calls init_logging
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
