//! World file rendering, parsing and sidecar naming.
//!
//! A world file is six lines of decimal text in the order
//! `A, D, B, E, C, F`. GIS tools find it next to the raster by swapping the
//! image extension for the mapped sidecar extension, so the base name must
//! match the image exactly.

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::affine::AffineTransform;
use crate::error::{GeorefError, GeorefResult};

/// Fewest significant digits ever written for a coefficient.
pub const MIN_SIGNIFICANT_DIGITS: u32 = 10;

/// Extensions probed when looking for an existing world file.
pub const SIDECAR_LOOKUP_ORDER: [&str; 4] = ["tfw", "jgw", "pgw", "wld"];

/// Numeric precision of rendered coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldFilePrecision {
    /// Significant digits per coefficient; clamped to at least
    /// [`MIN_SIGNIFICANT_DIGITS`].
    pub significant_digits: u32,
}

impl Default for WorldFilePrecision {
    fn default() -> Self {
        Self {
            significant_digits: 12,
        }
    }
}

impl WorldFilePrecision {
    fn digits(&self) -> u32 {
        self.significant_digits.clamp(MIN_SIGNIFICANT_DIGITS, 17)
    }

    /// Fixed-point text of `value` with the configured significant digits.
    pub fn format(&self, value: f64) -> String {
        // Avoid "-0.000..." lines
        let value = if value == 0.0 { 0.0 } else { value };
        let magnitude = if value == 0.0 {
            0
        } else {
            value.abs().log10().floor() as i32
        };
        let decimals = (self.digits() as i32 - 1 - magnitude).clamp(0, 20) as usize;
        format!("{value:.decimals$}")
    }
}

/// Image format for a file extension, accepting a leading dot and any case.
///
/// Only the formats with a world-file convention are recognised.
pub fn image_format(extension: &str) -> GeorefResult<ImageFormat> {
    let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        "tif" | "tiff" => Ok(ImageFormat::Tiff),
        "gif" => Ok(ImageFormat::Gif),
        "bmp" => Ok(ImageFormat::Bmp),
        _ => Err(GeorefError::UnsupportedFormat(format!(
            "'{extension}' has no world file convention"
        ))),
    }
}

/// World-file extension for an image format.
pub fn sidecar_extension(format: ImageFormat) -> GeorefResult<&'static str> {
    match format {
        ImageFormat::Jpeg => Ok("jgw"),
        ImageFormat::Png => Ok("pgw"),
        ImageFormat::Tiff => Ok("tfw"),
        ImageFormat::Gif => Ok("gfw"),
        ImageFormat::Bmp => Ok("bpw"),
        other => Err(GeorefError::UnsupportedFormat(format!(
            "{other:?} has no world file convention"
        ))),
    }
}

/// World-file extension for an image file extension (`"JPG"` -> `"jgw"`).
pub fn world_file_extension(image_extension: &str) -> GeorefResult<&'static str> {
    sidecar_extension(image_format(image_extension)?)
}

/// World-file extension for raw image bytes, detected from the header.
pub fn world_file_extension_for_bytes(bytes: &[u8]) -> GeorefResult<&'static str> {
    let format = image::guess_format(bytes).map_err(|e| {
        GeorefError::UnsupportedFormat(format!("cannot detect image format: {e}"))
    })?;
    sidecar_extension(format)
}

fn split_extension(file_name: &str) -> Option<(&str, &str)> {
    let (base, ext) = file_name.rsplit_once('.')?;
    // A leading dot alone (".png") is a hidden file with no base
    if base.is_empty() || base.ends_with(['/', '\\']) || ext.contains(['/', '\\']) {
        return None;
    }
    Some((base, ext))
}

/// Base name of an image file, without its extension.
pub fn image_base_name(file_name: &str) -> &str {
    split_extension(file_name).map_or(file_name, |(base, _)| base)
}

/// Sidecar file name for an image (`plan.jpg` -> `plan.jgw`).
pub fn sidecar_file_name(image_file_name: &str) -> GeorefResult<String> {
    let (base, ext) = split_extension(image_file_name).ok_or_else(|| {
        GeorefError::UnsupportedFormat(format!("'{image_file_name}' has no file extension"))
    })?;
    Ok(format!("{base}.{}", world_file_extension(ext)?))
}

/// Candidate world-file names for an image, in lookup order.
pub fn sidecar_candidates(image_file_name: &str) -> Vec<String> {
    let base = image_base_name(image_file_name);
    SIDECAR_LOOKUP_ORDER
        .iter()
        .map(|ext| format!("{base}.{ext}"))
        .collect()
}

/// Render six newline-terminated lines in world-file order.
pub fn render_world_file(transform: &AffineTransform, precision: WorldFilePrecision) -> String {
    let mut text = String::with_capacity(6 * 24);
    for value in transform.world_file_order() {
        text.push_str(&precision.format(value));
        text.push('\n');
    }
    text
}

/// A world file read back from text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldFile {
    pub transform: AffineTransform,
}

impl WorldFile {
    /// Parse the first six non-empty lines as `A, D, B, E, C, F`.
    ///
    /// # Errors
    ///
    /// Returns [`GeorefError::WorldFileParse`] when fewer than six values are
    /// present or one is not a number.
    pub fn parse(text: &str) -> GeorefResult<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() < 6 {
            return Err(GeorefError::WorldFileParse(format!(
                "expected 6 lines, got {}",
                lines.len()
            )));
        }

        let mut values = [0.0; 6];
        for (i, (slot, line)) in values.iter_mut().zip(&lines).enumerate() {
            *slot = line.parse::<f64>().map_err(|_| {
                GeorefError::WorldFileParse(format!("line {} is not a number: '{line}'", i + 1))
            })?;
        }

        let [a, d, b, e, c, f] = values;
        let transform = AffineTransform::from_coefficients(a, b, c, d, e, f)
            .map_err(|err| GeorefError::WorldFileParse(err.to_string()))?;
        Ok(Self { transform })
    }

    pub fn render(&self, precision: WorldFilePrecision) -> String {
        render_world_file(&self.transform, precision)
    }
}
