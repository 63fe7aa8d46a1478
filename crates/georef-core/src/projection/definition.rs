//! Projection identifiers and the built-in definition table.

use serde::{Deserialize, Serialize};

use crate::error::{GeorefError, GeorefResult};

/// A projected coordinate system known by EPSG code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownProjection {
    pub epsg: u32,
    pub name: &'static str,
    pub proj: &'static str,
    pub central_meridian_deg: f64,
}

impl KnownProjection {
    /// `EPSG:<code>` form used in commands.
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

/// Built-in projections, PL-1992 first.
pub const KNOWN_PROJECTIONS: &[KnownProjection] = &[
    KnownProjection {
        epsg: 2180,
        name: "ETRF2000-PL / CS92",
        proj: "+proj=tmerc +lat_0=0 +lon_0=19 +k=0.9993 +x_0=500000 +y_0=-5300000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
        central_meridian_deg: 19.0,
    },
    KnownProjection {
        epsg: 2176,
        name: "ETRF2000-PL / CS2000/15",
        proj: "+proj=tmerc +lat_0=0 +lon_0=15 +k=0.999923 +x_0=5500000 +y_0=0 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
        central_meridian_deg: 15.0,
    },
    KnownProjection {
        epsg: 2177,
        name: "ETRF2000-PL / CS2000/18",
        proj: "+proj=tmerc +lat_0=0 +lon_0=18 +k=0.999923 +x_0=6500000 +y_0=0 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
        central_meridian_deg: 18.0,
    },
    KnownProjection {
        epsg: 2178,
        name: "ETRF2000-PL / CS2000/21",
        proj: "+proj=tmerc +lat_0=0 +lon_0=21 +k=0.999923 +x_0=7500000 +y_0=0 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
        central_meridian_deg: 21.0,
    },
    KnownProjection {
        epsg: 2179,
        name: "ETRF2000-PL / CS2000/24",
        proj: "+proj=tmerc +lat_0=0 +lon_0=24 +k=0.999923 +x_0=8500000 +y_0=0 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
        central_meridian_deg: 24.0,
    },
    KnownProjection {
        epsg: 32633,
        name: "WGS 84 / UTM zone 33N",
        proj: "+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs",
        central_meridian_deg: 15.0,
    },
    KnownProjection {
        epsg: 32634,
        name: "WGS 84 / UTM zone 34N",
        proj: "+proj=utm +zone=34 +datum=WGS84 +units=m +no_defs",
        central_meridian_deg: 21.0,
    },
    KnownProjection {
        epsg: 32635,
        name: "WGS 84 / UTM zone 35N",
        proj: "+proj=utm +zone=35 +datum=WGS84 +units=m +no_defs",
        central_meridian_deg: 27.0,
    },
];

/// Look up a built-in projection by EPSG code.
pub fn known_projection(epsg: u32) -> Option<&'static KnownProjection> {
    KNOWN_PROJECTIONS.iter().find(|p| p.epsg == epsg)
}

/// Parse `EPSG:2180` / `epsg:2180` into a code.
fn parse_epsg(identifier: &str) -> Option<u32> {
    let (prefix, code) = identifier.split_once(':')?;
    if !prefix.trim().eq_ignore_ascii_case("epsg") {
        return None;
    }
    code.trim().parse().ok()
}

/// Value of a `+key=value` parameter in a PROJ string.
fn proj_parameter<'a>(definition: &'a str, key: &str) -> Option<&'a str> {
    definition.split_whitespace().find_map(|token| {
        let (k, v) = token.trim_start_matches('+').split_once('=')?;
        (k == key).then_some(v)
    })
}

/// The target coordinate system of a georeference.
///
/// `identifier` is either an `EPSG:<code>` from the built-in table or a
/// full PROJ definition string. The central meridian is stored next to it
/// because convergence needs it whatever the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDefinition {
    pub identifier: String,
    pub central_meridian_deg: f64,
}

impl Default for ProjectionDefinition {
    fn default() -> Self {
        Self::pl1992()
    }
}

impl ProjectionDefinition {
    /// PL-1992 (EPSG:2180), central meridian 19°E.
    pub fn pl1992() -> Self {
        Self {
            identifier: "EPSG:2180".to_string(),
            central_meridian_deg: 19.0,
        }
    }

    /// A custom PROJ definition with an explicit central meridian.
    pub fn custom(definition: impl Into<String>, central_meridian_deg: f64) -> Self {
        Self {
            identifier: definition.into(),
            central_meridian_deg,
        }
    }

    /// Resolve user input from the projection field.
    ///
    /// Accepts a built-in `EPSG:<code>` or a PROJ string. For PROJ strings
    /// the central meridian is read from `+lon_0` (PROJ's default is 0).
    ///
    /// # Errors
    ///
    /// Returns [`GeorefError::Projection`] for an empty field, an EPSG code
    /// outside the built-in table, a geographic (unprojected) definition or
    /// an unreadable `+lon_0`.
    pub fn from_identifier(input: &str) -> GeorefResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(GeorefError::Projection(
                "projection definition is empty".to_string(),
            ));
        }

        if let Some(epsg) = parse_epsg(input) {
            let known = known_projection(epsg).ok_or_else(|| {
                GeorefError::Projection(format!(
                    "EPSG:{epsg} is not built in; supply its PROJ definition string instead"
                ))
            })?;
            return Ok(Self {
                identifier: known.identifier(),
                central_meridian_deg: known.central_meridian_deg,
            });
        }

        if !input.contains("+proj=") {
            return Err(GeorefError::Projection(format!(
                "'{input}' is neither an EPSG code nor a PROJ definition"
            )));
        }
        if let Some(kind) = proj_parameter(input, "proj") {
            if matches!(kind, "longlat" | "latlong" | "lonlat" | "latlon") {
                return Err(GeorefError::Projection(format!(
                    "'+proj={kind}' is geographic; a world file needs a projected system"
                )));
            }
        }

        let central_meridian_deg = match proj_parameter(input, "lon_0") {
            Some(value) => value.parse::<f64>().map_err(|_| {
                GeorefError::Projection(format!("cannot read +lon_0={value}"))
            })?,
            None => 0.0,
        };

        Ok(Self::custom(input, central_meridian_deg))
    }

    /// Built-in entry this definition refers to, if any.
    pub fn known(&self) -> Option<&'static KnownProjection> {
        parse_epsg(&self.identifier).and_then(known_projection)
    }

    pub fn is_builtin(&self) -> bool {
        self.known().is_some()
    }

    /// Spatial reference text for command-line tools (`-a_srs`).
    pub fn srs_text(&self) -> &str {
        self.identifier.trim()
    }
}
