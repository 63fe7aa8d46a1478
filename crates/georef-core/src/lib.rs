//! Georef Core - cave plan georeferencing engine
//!
//! This crate turns a handful of calibration points marked on a scanned,
//! unreferenced cave plan into the six coefficients of an affine world file,
//! plus the command text needed to turn the plan into a GeoTIFF.
//!
//! # Pipeline
//!
//! ```text
//! CalibrationPointStore ─┬─ scale ───────┐
//!                        ├─ orientation ─┼─ affine ─┬─ worldfile
//!                        └─ projection ──┘          └─ command
//! ```
//!
//! Every stage is a pure function of its inputs. No file or network I/O
//! happens here; reading images and running the generated commands is the
//! caller's job.
//!
//! # Coordinate System
//!
//! - Pixel coordinates are in full-resolution image space, origin top-left,
//!   rows increasing downward
//! - Geographic coordinates are WGS84 degrees
//! - Projected coordinates are easting/northing in the target system's units
//! - Angles are radians, positive = counter-clockwise in the projected plane

pub mod affine;
pub mod calibration;
pub mod command;
pub mod error;
pub mod georeference;
pub mod orientation;
pub mod overlay;
pub mod projection;
pub mod record;
pub mod scale;
pub mod worldfile;

pub use affine::{build_affine, AffineTransform, AnchorTie};
pub use calibration::{
    CalibrationPoint, CalibrationPointStore, CalibrationRole, CalibrationSession, DisplayFrame,
};
pub use command::{generate_commands, CommandOptions, Compression, GeneratedCommands};
pub use error::{GeorefError, GeorefResult};
pub use georeference::{
    compute_georeference, compute_transform, GeoreferenceResult, TransformSolution,
};
pub use orientation::{resolve_orientation, ConvergenceModel, Orientation, OrientationInput};
pub use projection::{CoordinateProjector, ProjectionDefinition, Projector};
pub use scale::{resolve_scale, ScaleResolution, ScaleSpec};

use serde::{Deserialize, Serialize};

/// A point in full-resolution image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Column (increasing to the right)
    pub x: f64,
    /// Row (increasing downward)
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Check that both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Size of a raster in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Geographic position of the cave entrance in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoAnchor {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoAnchor {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True for the (0, 0) placeholder that missing database coordinates
    /// collapse to.
    pub fn is_null_island(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// A coordinate in the target projected system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub easting: f64,
    pub northing: f64,
}

impl ProjectedPoint {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    pub fn is_finite(&self) -> bool {
        self.easting.is_finite() && self.northing.is_finite()
    }
}
