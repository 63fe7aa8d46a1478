//! Command text bindings.

use georef_core::command::{self, CommandOptions};
use georef_core::projection::ProjectionDefinition;
use wasm_bindgen::prelude::*;

/// Standard and monochrome command text for an image.
///
/// # Arguments
/// * `image_name` - Plan file name, e.g. `000390_T.E-12.jpg`
/// * `projection` - `EPSG:<code>` or a PROJ definition string
/// * `options` - Optional `CommandOptions` object (`undefined` for defaults)
///
/// # Returns
/// `{ standard, monochrome }`; `monochrome` has one command per line.
#[wasm_bindgen]
pub fn generate_commands(
    image_name: &str,
    projection: &str,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let projection = ProjectionDefinition::from_identifier(projection)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let options: CommandOptions = if options.is_undefined() || options.is_null() {
        CommandOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid command options: {}", e)))?
    };

    let commands = command::generate_commands(image_name, &projection, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&commands).map_err(|e| JsValue::from_str(&e.to_string()))
}
