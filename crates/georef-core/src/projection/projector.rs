//! Projector backends.

use proj4rs::transform::transform;
use proj4rs::Proj;

use super::definition::{known_projection, KnownProjection, ProjectionDefinition};
use crate::error::{GeorefError, GeorefResult};
use crate::{GeoAnchor, ProjectedPoint};

/// WGS84 geographic source system; proj4rs works in radians here.
const WGS84_LONLAT: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Projects WGS84 positions into a target coordinate system.
pub trait Projector {
    /// Forward projection `(lat, lon) -> (easting, northing)`.
    fn project(&self, anchor: GeoAnchor) -> GeorefResult<ProjectedPoint>;

    /// Inverse projection `(easting, northing) -> (lat, lon)`.
    fn unproject(&self, point: ProjectedPoint) -> GeorefResult<GeoAnchor>;

    /// The definition this projector was built from.
    fn definition(&self) -> &ProjectionDefinition;
}

/// A geographic/target system pair evaluated with proj4rs.
struct ProjPair {
    geographic: Proj,
    target: Proj,
}

impl ProjPair {
    fn new(target_definition: &str) -> GeorefResult<Self> {
        let geographic = Proj::from_proj_string(WGS84_LONLAT).map_err(|e| {
            GeorefError::Projection(format!("cannot initialise WGS84: {e:?}"))
        })?;
        let target = Proj::from_proj_string(target_definition).map_err(|e| {
            GeorefError::Projection(format!(
                "cannot parse projection '{target_definition}': {e:?}"
            ))
        })?;
        Ok(Self { geographic, target })
    }

    fn forward(&self, anchor: GeoAnchor) -> GeorefResult<ProjectedPoint> {
        let GeoAnchor {
            latitude,
            longitude,
        } = anchor;
        if !(latitude.is_finite() && longitude.is_finite())
            || latitude.abs() > 90.0
            || longitude.abs() > 180.0
        {
            return Err(GeorefError::Projection(format!(
                "coordinates lat={latitude}, lon={longitude} are not a valid WGS84 position"
            )));
        }

        let mut point = (longitude.to_radians(), latitude.to_radians(), 0.0);
        transform(&self.geographic, &self.target, &mut point).map_err(|e| {
            GeorefError::Projection(format!(
                "lat={latitude}, lon={longitude} is outside the projection domain: {e:?}"
            ))
        })?;

        let projected = ProjectedPoint::new(point.0, point.1);
        if !projected.is_finite() {
            return Err(GeorefError::Projection(format!(
                "lat={latitude}, lon={longitude} projects to a non-finite coordinate"
            )));
        }
        Ok(projected)
    }

    fn inverse(&self, projected: ProjectedPoint) -> GeorefResult<GeoAnchor> {
        if !projected.is_finite() {
            return Err(GeorefError::Projection(
                "cannot unproject a non-finite coordinate".to_string(),
            ));
        }

        let mut point = (projected.easting, projected.northing, 0.0);
        transform(&self.target, &self.geographic, &mut point).map_err(|e| {
            GeorefError::Projection(format!(
                "E={}, N={} cannot be unprojected: {e:?}",
                projected.easting, projected.northing
            ))
        })?;

        let anchor = GeoAnchor::new(point.1.to_degrees(), point.0.to_degrees());
        if !(anchor.latitude.is_finite() && anchor.longitude.is_finite()) {
            return Err(GeorefError::Projection(format!(
                "E={}, N={} unprojects to a non-finite position",
                projected.easting, projected.northing
            )));
        }
        Ok(anchor)
    }
}

/// Projector for an entry of the built-in EPSG table.
pub struct BuiltinProjector {
    known: &'static KnownProjection,
    definition: ProjectionDefinition,
    pair: ProjPair,
}

impl BuiltinProjector {
    pub fn new(known: &'static KnownProjection) -> GeorefResult<Self> {
        Ok(Self {
            known,
            definition: ProjectionDefinition {
                identifier: known.identifier(),
                central_meridian_deg: known.central_meridian_deg,
            },
            pair: ProjPair::new(known.proj)?,
        })
    }

    /// The default PL-1992 projector.
    pub fn pl1992() -> GeorefResult<Self> {
        Self::from_epsg(2180)
    }

    pub fn from_epsg(epsg: u32) -> GeorefResult<Self> {
        let known = known_projection(epsg).ok_or_else(|| {
            GeorefError::Projection(format!("EPSG:{epsg} is not built in"))
        })?;
        Self::new(known)
    }

    pub fn known(&self) -> &'static KnownProjection {
        self.known
    }
}

impl std::fmt::Debug for BuiltinProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinProjector")
            .field("epsg", &self.known.epsg)
            .field("name", &self.known.name)
            .finish_non_exhaustive()
    }
}

impl Projector for BuiltinProjector {
    fn project(&self, anchor: GeoAnchor) -> GeorefResult<ProjectedPoint> {
        self.pair.forward(anchor)
    }

    fn unproject(&self, point: ProjectedPoint) -> GeorefResult<GeoAnchor> {
        self.pair.inverse(point)
    }

    fn definition(&self) -> &ProjectionDefinition {
        &self.definition
    }
}

/// Projector for a user-supplied PROJ definition string.
pub struct CustomProjector {
    definition: ProjectionDefinition,
    pair: ProjPair,
}

impl CustomProjector {
    pub fn new(definition: ProjectionDefinition) -> GeorefResult<Self> {
        let pair = ProjPair::new(definition.srs_text())?;
        Ok(Self { definition, pair })
    }
}

impl std::fmt::Debug for CustomProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomProjector")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl Projector for CustomProjector {
    fn project(&self, anchor: GeoAnchor) -> GeorefResult<ProjectedPoint> {
        self.pair.forward(anchor)
    }

    fn unproject(&self, point: ProjectedPoint) -> GeorefResult<GeoAnchor> {
        self.pair.inverse(point)
    }

    fn definition(&self) -> &ProjectionDefinition {
        &self.definition
    }
}

/// The projector selected by a [`ProjectionDefinition`].
#[derive(Debug)]
pub enum CoordinateProjector {
    Builtin(BuiltinProjector),
    Custom(CustomProjector),
}

impl CoordinateProjector {
    /// Pick the built-in backend for known EPSG codes, the custom one
    /// otherwise.
    pub fn from_definition(definition: &ProjectionDefinition) -> GeorefResult<Self> {
        match definition.known() {
            Some(known) => {
                let mut builtin = BuiltinProjector::new(known)?;
                // Keep a caller-supplied meridian override
                builtin.definition.central_meridian_deg = definition.central_meridian_deg;
                Ok(CoordinateProjector::Builtin(builtin))
            }
            None => Ok(CoordinateProjector::Custom(CustomProjector::new(
                definition.clone(),
            )?)),
        }
    }

    fn inner(&self) -> &dyn Projector {
        match self {
            CoordinateProjector::Builtin(p) => p,
            CoordinateProjector::Custom(p) => p,
        }
    }
}

impl Projector for CoordinateProjector {
    fn project(&self, anchor: GeoAnchor) -> GeorefResult<ProjectedPoint> {
        self.inner().project(anchor)
    }

    fn unproject(&self, point: ProjectedPoint) -> GeorefResult<GeoAnchor> {
        self.inner().unproject(point)
    }

    fn definition(&self) -> &ProjectionDefinition {
        self.inner().definition()
    }
}
