//! The explicit input value of one georeference computation.

use serde::{Deserialize, Serialize};

use super::points::{CalibrationPointStore, CalibrationRole};
use crate::command::CommandOptions;
use crate::error::{GeorefError, GeorefResult};
use crate::orientation::ConvergenceModel;
use crate::projection::ProjectionDefinition;
use crate::scale::ScaleSpec;
use crate::worldfile::WorldFilePrecision;
use crate::{GeoAnchor, ImageDimensions};

/// Everything the engine reads for one computation.
///
/// The UI owns this value and passes it in on every change; the engine keeps
/// nothing between calls. Missing fields deserialize to their defaults so a
/// partially filled form is still a valid session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSession {
    pub points: CalibrationPointStore,
    /// Entrance position, from the cave record or typed in by the user
    pub anchor: Option<GeoAnchor>,
    pub scale: Option<ScaleSpec>,
    /// Read the north arrow; when off the plan's up is taken as true north
    pub use_north_arrow: bool,
    /// Extra clockwise correction in degrees
    pub declination_deg: f64,
    pub convergence: ConvergenceModel,
    pub projection: ProjectionDefinition,
    /// File name of the plan image, used for the sidecar and commands
    pub image_name: String,
    pub image_dimensions: Option<ImageDimensions>,
    pub commands: CommandOptions,
    pub precision: WorldFilePrecision,
}

impl CalibrationSession {
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            ..Self::default()
        }
    }

    /// Decode a session from its JSON form.
    pub fn from_json(json: &str) -> GeorefResult<Self> {
        serde_json::from_str(json).map_err(|e| GeorefError::Session(e.to_string()))
    }

    pub fn to_json(&self) -> GeorefResult<String> {
        serde_json::to_string(self).map_err(|e| GeorefError::Session(e.to_string()))
    }

    /// Roles still to be marked under the current north-arrow setting.
    pub fn missing_roles(&self) -> Vec<CalibrationRole> {
        self.points.missing_roles(self.use_north_arrow)
    }

    pub fn is_complete(&self) -> bool {
        self.points.is_complete(self.use_north_arrow)
    }

    pub fn ensure_complete(&self) -> GeorefResult<()> {
        self.points.ensure_complete(self.use_north_arrow)
    }

    /// Entrance geographic position.
    pub fn require_anchor(&self) -> GeorefResult<GeoAnchor> {
        self.anchor.ok_or_else(|| {
            GeorefError::Projection("entrance has no geographic coordinates".to_string())
        })
    }

    /// Real-world length of the scale bar.
    pub fn require_scale(&self) -> GeorefResult<ScaleSpec> {
        self.scale.ok_or_else(|| {
            GeorefError::InvalidScale("real-world length of the scale bar is not set".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        let session = CalibrationSession::default();
        assert!(!session.use_north_arrow);
        assert_eq!(session.declination_deg, 0.0);
        assert_eq!(session.convergence, ConvergenceModel::SmallAngle);
        assert_eq!(session.projection.identifier, "EPSG:2180");
        assert!(session.points.is_empty());
        assert_eq!(
            session.missing_roles(),
            vec![
                CalibrationRole::Entrance,
                CalibrationRole::ScaleStart,
                CalibrationRole::ScaleEnd
            ]
        );
    }

    #[test]
    fn test_north_arrow_toggle_changes_requirements() {
        let mut session = CalibrationSession::new("plan.jpg");
        session.points.set_point(CalibrationRole::Entrance, 1.0, 2.0);
        session.points.set_point(CalibrationRole::ScaleStart, 10.0, 10.0);
        session.points.set_point(CalibrationRole::ScaleEnd, 510.0, 10.0);
        assert!(session.is_complete());

        session.use_north_arrow = true;
        assert!(!session.is_complete());
        match session.ensure_complete().unwrap_err() {
            GeorefError::Validation { missing } => {
                assert_eq!(missing, CalibrationRole::NORTH_ARROW.to_vec());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_from_partial_json() {
        let session = CalibrationSession::from_json(
            r#"{
                "points": [
                    {"role": "entrance", "x": 1200, "y": 800},
                    {"role": "scale_start", "x": 100, "y": 3000},
                    {"role": "scale_end", "x": 600, "y": 3000}
                ],
                "anchor": {"latitude": 49.23833, "longitude": 19.90069},
                "scale": {"real_world_length_m": 50},
                "image_name": "plan.jpg",
                "commands": {"compression": "DEFLATE"}
            }"#,
        )
        .unwrap();

        assert!(session.is_complete());
        assert_eq!(session.require_anchor().unwrap().latitude, 49.23833);
        assert_eq!(session.require_scale().unwrap().real_world_length_m, 50.0);
        assert!(session.commands.tiled);
        assert_eq!(session.projection, ProjectionDefinition::pl1992());
    }

    #[test]
    fn test_json_round_trip() {
        let mut session = CalibrationSession::new("plan.png");
        session.points.set_point(CalibrationRole::NorthTip, 5.0, 6.0);
        session.declination_deg = 4.5;
        let json = session.to_json().unwrap();
        assert_eq!(CalibrationSession::from_json(&json).unwrap(), session);
    }

    #[test]
    fn test_bad_json_is_session_error() {
        let err = CalibrationSession::from_json("{\"points\": 3}").unwrap_err();
        assert!(matches!(err, GeorefError::Session(_)));
    }

    #[test]
    fn test_missing_anchor_and_scale() {
        let session = CalibrationSession::default();
        assert!(matches!(
            session.require_anchor(),
            Err(GeorefError::Projection(_))
        ));
        assert!(matches!(
            session.require_scale(),
            Err(GeorefError::InvalidScale(_))
        ));
    }
}
