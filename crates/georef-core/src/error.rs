//! Error types for the georeferencing engine.
//!
//! Every failure is a local validation outcome. Messages are meant to be
//! shown to the user as-is so the offending input can be corrected.

use thiserror::Error;

use crate::calibration::CalibrationRole;

/// Errors produced while computing a georeference.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeorefError {
    /// One or more required calibration points have not been marked.
    #[error("Missing calibration point(s): {}", format_roles(.missing))]
    Validation { missing: Vec<CalibrationRole> },

    /// The scale segment is degenerate or the real-world length is not positive.
    #[error("Invalid scale: {0}")]
    InvalidScale(String),

    /// The projection definition cannot be resolved or the point is outside its domain.
    #[error("Projection error: {0}")]
    Projection(String),

    /// A computed coefficient is not a finite number.
    #[error("Transform computation failed: {0}")]
    TransformComputation(String),

    /// The image format has no world-file extension.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A world file could not be read back.
    #[error("Invalid world file: {0}")]
    WorldFileParse(String),

    /// A cave record line could not be decoded.
    #[error("Invalid cave record: {0}")]
    Record(String),

    /// A serialized calibration session could not be decoded.
    #[error("Invalid session: {0}")]
    Session(String),
}

/// Result alias used throughout the crate.
pub type GeorefResult<T> = Result<T, GeorefError>;

fn format_roles(roles: &[CalibrationRole]) -> String {
    roles
        .iter()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<serde_json::Error> for GeorefError {
    fn from(err: serde_json::Error) -> Self {
        GeorefError::Record(err.to_string())
    }
}
