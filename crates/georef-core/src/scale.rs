//! Scale derivation from the plan's scale bar.
//!
//! The user marks both ends of a drawn scale bar and types in its real
//! length. The ratio gives the ground size of one pixel:
//!
//! ```text
//! meters_per_pixel = real_world_length_m / |scale_end - scale_start|
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GeorefError, GeorefResult};
use crate::PixelPoint;

/// Scale bars shorter than this (in pixels) are treated as a double click
/// on the same spot.
pub const MIN_PIXEL_DISTANCE: f64 = 1e-6;

/// Known real-world length of the marked scale segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleSpec {
    /// Segment length in meters (must be > 0)
    pub real_world_length_m: f64,
}

impl ScaleSpec {
    pub fn new(real_world_length_m: f64) -> Self {
        Self {
            real_world_length_m,
        }
    }
}

/// Outcome of scale resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleResolution {
    /// Length of the marked segment in pixels
    pub pixel_distance: f64,
    /// Ground size of one pixel in meters
    pub meters_per_pixel: f64,
}

impl ScaleResolution {
    /// Inverse ratio, handy for display ("N px = 1 m").
    pub fn pixels_per_meter(&self) -> f64 {
        1.0 / self.meters_per_pixel
    }
}

/// Convert a marked scale segment into a meters-per-pixel ratio.
///
/// # Errors
///
/// Returns [`GeorefError::InvalidScale`] when the length is not a positive
/// finite number or when the two points coincide.
pub fn resolve_scale(
    start: PixelPoint,
    end: PixelPoint,
    spec: ScaleSpec,
) -> GeorefResult<ScaleResolution> {
    let length = spec.real_world_length_m;
    if !length.is_finite() || length <= 0.0 {
        return Err(GeorefError::InvalidScale(format!(
            "real-world length must be positive, got {length}"
        )));
    }

    let pixel_distance = start.distance_to(&end);
    if !pixel_distance.is_finite() {
        return Err(GeorefError::InvalidScale(
            "scale points are not finite".to_string(),
        ));
    }
    if pixel_distance < MIN_PIXEL_DISTANCE {
        return Err(GeorefError::InvalidScale(
            "scale start and end points coincide".to_string(),
        ));
    }

    let meters_per_pixel = length / pixel_distance;
    log::debug!(
        "scale bar {:.2} px = {} m -> {:.6} m/px",
        pixel_distance,
        length,
        meters_per_pixel
    );

    Ok(ScaleResolution {
        pixel_distance,
        meters_per_pixel,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
