//! Forward (and inverse) projection of the geographic anchor.
//!
//! The rest of the engine only relies on the [`Projector`] contract:
//! `project(lat, lon) -> (easting, northing)`. Two backends satisfy it:
//!
//! - [`BuiltinProjector`]: a compiled-in definition looked up by EPSG code
//!   (PL-1992 / EPSG:2180 by default)
//! - [`CustomProjector`]: any PROJ definition string supplied by the user
//!
//! Both are evaluated with `proj4rs`, a pure-Rust PROJ port that also runs
//! in the browser.

mod definition;
mod projector;

pub use definition::{KnownProjection, ProjectionDefinition, KNOWN_PROJECTIONS};
pub use projector::{BuiltinProjector, CoordinateProjector, CustomProjector, Projector};
