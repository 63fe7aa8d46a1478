//! The full computation from a calibration session to world file and
//! commands.
//!
//! Stages run in a fixed order so the first failure reported is always the
//! most basic one:
//!
//! 1. point completeness
//! 2. scale
//! 3. anchor projection
//! 4. orientation
//! 5. affine assembly
//! 6. sidecar format and command text
//!
//! Nothing is cached; each call starts from the session alone.

use serde::Serialize;

use crate::affine::{build_affine, AffineTransform, AnchorTie};
use crate::calibration::{CalibrationRole, CalibrationSession};
use crate::command::{generate_commands, GeneratedCommands};
use crate::error::{GeorefError, GeorefResult};
use crate::orientation::{resolve_orientation, Orientation, OrientationInput};
use crate::overlay::Footprint;
use crate::projection::{CoordinateProjector, Projector};
use crate::scale::{resolve_scale, ScaleResolution};
use crate::worldfile::{render_world_file, sidecar_file_name, world_file_extension};
use crate::ProjectedPoint;

/// The transform together with the values it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformSolution {
    pub scale: ScaleResolution,
    pub orientation: Orientation,
    pub anchor_projected: ProjectedPoint,
    pub transform: AffineTransform,
}

/// Everything the UI shows after a successful computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoreferenceResult {
    pub scale: ScaleResolution,
    pub orientation: Orientation,
    pub anchor_projected: ProjectedPoint,
    pub transform: AffineTransform,
    pub world_file_text: String,
    pub world_file_extension: &'static str,
    pub sidecar_name: String,
    pub commands: GeneratedCommands,
    /// Present when the session knows the image size
    pub footprint: Option<Footprint>,
}

fn validated_scale(session: &CalibrationSession) -> GeorefResult<ScaleResolution> {
    session.ensure_complete()?;
    let start = session.points.require(CalibrationRole::ScaleStart)?;
    let end = session.points.require(CalibrationRole::ScaleEnd)?;
    resolve_scale(start, end, session.require_scale()?)
}

fn solve(
    session: &CalibrationSession,
    scale: ScaleResolution,
    projector: &dyn Projector,
) -> GeorefResult<TransformSolution> {
    let anchor = session.require_anchor()?;
    if anchor.is_null_island() {
        log::warn!("entrance has coordinates (0, 0); the plan will be placed at null island");
    }
    let anchor_projected = projector.project(anchor)?;
    log::info!(
        "entrance lat={}, lon={} -> E={:.2}, N={:.2}",
        anchor.latitude,
        anchor.longitude,
        anchor_projected.easting,
        anchor_projected.northing
    );

    let north_arrow = if session.use_north_arrow {
        session.points.north_arrow()
    } else {
        None
    };
    let orientation = resolve_orientation(&OrientationInput {
        north_arrow,
        declination_deg: session.declination_deg,
        anchor,
        central_meridian_deg: projector.definition().central_meridian_deg,
        convergence: session.convergence,
    })?;
    log::info!(
        "meridian convergence {:.6} rad ({:.4} deg), rotation {:.4} deg",
        orientation.convergence,
        orientation.convergence.to_degrees(),
        orientation.rotation_degrees()
    );

    let entrance = session.points.require(CalibrationRole::Entrance)?;
    let transform = build_affine(
        scale.meters_per_pixel,
        orientation.rotation,
        AnchorTie {
            pixel: entrance,
            projected: anchor_projected,
        },
    )?;
    log::info!(
        "affine A={} B={} C={} D={} E={} F={}",
        transform.a(),
        transform.b(),
        transform.c(),
        transform.d(),
        transform.e(),
        transform.f()
    );

    Ok(TransformSolution {
        scale,
        orientation,
        anchor_projected,
        transform,
    })
}

/// Compute the affine transform with a caller-supplied projector.
///
/// The projector's definition takes the place of `session.projection`, so
/// the convergence meridian matches the system the anchor is projected in.
///
/// # Errors
///
/// The first failing stage decides the error: [`GeorefError::Validation`]
/// for unmarked points, [`GeorefError::InvalidScale`],
/// [`GeorefError::Projection`] or [`GeorefError::TransformComputation`].
pub fn compute_transform(
    session: &CalibrationSession,
    projector: &dyn Projector,
) -> GeorefResult<TransformSolution> {
    let scale = validated_scale(session)?;
    solve(session, scale, projector)
}

/// Full computation with a caller-supplied projector.
///
/// The commands are tagged with the projector's system, not
/// `session.projection`.
pub fn compute_with_projector(
    session: &CalibrationSession,
    projector: &dyn Projector,
) -> GeorefResult<GeoreferenceResult> {
    let scale = validated_scale(session)?;
    finish(session, solve(session, scale, projector)?, projector)
}

/// Full computation, selecting the projector from the session's projection.
pub fn compute_georeference(session: &CalibrationSession) -> GeorefResult<GeoreferenceResult> {
    let scale = validated_scale(session)?;
    let projector = CoordinateProjector::from_definition(&session.projection)?;
    finish(session, solve(session, scale, &projector)?, &projector)
}

fn finish(
    session: &CalibrationSession,
    solution: TransformSolution,
    projector: &dyn Projector,
) -> GeorefResult<GeoreferenceResult> {
    let image_name = session.image_name.trim();
    if image_name.is_empty() {
        return Err(GeorefError::UnsupportedFormat(
            "no image file name to derive the world file extension from".to_string(),
        ));
    }
    let sidecar_name = sidecar_file_name(image_name)?;
    let extension = image_name.rsplit_once('.').map_or("", |(_, ext)| ext);
    let world_file_extension = world_file_extension(extension)?;

    let world_file_text = render_world_file(&solution.transform, session.precision);
    let commands = generate_commands(image_name, projector.definition(), &session.commands)?;

    let footprint = match session.image_dimensions {
        Some(dimensions) => Some(Footprint::compute(
            &solution.transform,
            dimensions,
            projector,
        )?),
        None => None,
    };

    Ok(GeoreferenceResult {
        scale: solution.scale,
        orientation: solution.orientation,
        anchor_projected: solution.anchor_projected,
        transform: solution.transform,
        world_file_text,
        world_file_extension,
        sidecar_name,
        commands,
        footprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::ConvergenceModel;
    use crate::projection::{BuiltinProjector, ProjectionDefinition};
    use crate::scale::ScaleSpec;
    use crate::{GeoAnchor, ImageDimensions, PixelPoint};

    const ENTRANCE_PX: (f64, f64) = (1200.0, 800.0);

    fn tatra_session() -> CalibrationSession {
        let mut session = CalibrationSession::new("000390_T.E-12.jpg");
        session
            .points
            .set_point(CalibrationRole::Entrance, ENTRANCE_PX.0, ENTRANCE_PX.1);
        session
            .points
            .set_point(CalibrationRole::ScaleStart, 100.0, 3000.0);
        session
            .points
            .set_point(CalibrationRole::ScaleEnd, 600.0, 3000.0);
        session.anchor = Some(GeoAnchor::new(49.23833, 19.90069));
        session.scale = Some(ScaleSpec::new(50.0));
        session
    }

    #[test]
    fn test_tatra_scenario() {
        let result = compute_georeference(&tatra_session()).unwrap();

        assert!((result.scale.meters_per_pixel - 0.1).abs() < 1e-12);
        let expected_gamma = ((19.90069f64 - 19.0) * 49.23833f64.to_radians().sin()).to_radians();
        assert!((result.orientation.convergence - expected_gamma).abs() < 1e-12);
        assert_eq!(result.orientation.rotation, result.orientation.convergence);

        let t = result.transform;
        assert!((t.a() - 0.099993).abs() < 1e-6, "A = {}", t.a());
        assert!((t.e() + 0.099993).abs() < 1e-6, "E = {}", t.e());
        assert!((t.b() - 0.00119).abs() < 1e-5, "B = {}", t.b());
        assert_eq!(t.b(), t.d());

        let (x, y) = ENTRANCE_PX;
        let p = result.anchor_projected;
        assert!((t.c() - (p.easting - t.a() * x - t.b() * y)).abs() < 1e-9);
        assert!((t.f() - (p.northing - t.d() * x - t.e() * y)).abs() < 1e-9);

        let back = t.apply(PixelPoint::new(x, y));
        assert!((back.easting - p.easting).abs() < 1e-6);
        assert!((back.northing - p.northing).abs() < 1e-6);

        assert_eq!(result.world_file_extension, "jgw");
        assert_eq!(result.sidecar_name, "000390_T.E-12.jgw");
        assert_eq!(result.world_file_text.lines().count(), 6);
        assert!(result.commands.standard.contains("\"EPSG:2180\""));
        assert!(result.footprint.is_none());
    }

    #[test]
    fn test_scale_linearity() {
        let full = compute_georeference(&tatra_session()).unwrap();
        let mut session = tatra_session();
        session.scale = Some(ScaleSpec::new(25.0));
        let half = compute_georeference(&session).unwrap();

        assert_eq!(half.orientation.rotation, full.orientation.rotation);
        assert!((half.transform.a() * 2.0 - full.transform.a()).abs() < 1e-12);
        assert!((half.transform.b() * 2.0 - full.transform.b()).abs() < 1e-12);
        assert!((half.transform.d() * 2.0 - full.transform.d()).abs() < 1e-12);
        assert!((half.transform.e() * 2.0 - full.transform.e()).abs() < 1e-12);
    }

    #[test]
    fn test_validation_comes_first() {
        let mut session = tatra_session();
        session.points.remove(CalibrationRole::ScaleEnd);
        session.projection = ProjectionDefinition::custom("+proj=nonsense", 0.0);
        session.scale = None;
        match compute_georeference(&session).unwrap_err() {
            GeorefError::Validation { missing } => {
                assert_eq!(missing, vec![CalibrationRole::ScaleEnd]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_north_arrow_required_when_enabled() {
        let mut session = tatra_session();
        session.use_north_arrow = true;
        session.points.set_point(CalibrationRole::NorthBase, 50.0, 150.0);
        let err = compute_georeference(&session).unwrap_err();
        assert_eq!(
            err,
            GeorefError::Validation {
                missing: vec![CalibrationRole::NorthTip]
            }
        );
    }

    #[test]
    fn test_north_arrow_ignored_when_disabled() {
        let mut session = tatra_session();
        session.points.set_point(CalibrationRole::NorthBase, 50.0, 150.0);
        session.points.set_point(CalibrationRole::NorthTip, 150.0, 50.0);
        let result = compute_georeference(&session).unwrap();
        assert_eq!(result.orientation.arrow_angle, 0.0);

        session.use_north_arrow = true;
        let rotated = compute_georeference(&session).unwrap();
        assert!((rotated.orientation.arrow_angle - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!(
            (rotated.orientation.rotation
                - (result.orientation.convergence - std::f64::consts::FRAC_PI_4))
                .abs()
                < 1e-12
        );
    }

    #[test]
    fn test_degenerate_scale() {
        let mut session = tatra_session();
        session
            .points
            .set_point(CalibrationRole::ScaleEnd, 100.0, 3000.0);
        assert!(matches!(
            compute_georeference(&session),
            Err(GeorefError::InvalidScale(_))
        ));

        let mut session = tatra_session();
        session.scale = Some(ScaleSpec::new(0.0));
        assert!(matches!(
            compute_georeference(&session),
            Err(GeorefError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_projection_errors() {
        let mut session = tatra_session();
        session.projection = ProjectionDefinition::custom("+proj=nonsense", 0.0);
        assert!(matches!(
            compute_georeference(&session),
            Err(GeorefError::Projection(_))
        ));

        let mut session = tatra_session();
        session.anchor = None;
        assert!(matches!(
            compute_georeference(&session),
            Err(GeorefError::Projection(_))
        ));
    }

    #[test]
    fn test_unsupported_image_format() {
        let mut session = tatra_session();
        session.image_name = "plan.webp".to_string();
        assert!(matches!(
            compute_georeference(&session),
            Err(GeorefError::UnsupportedFormat(_))
        ));

        session.image_name = String::new();
        assert!(matches!(
            compute_georeference(&session),
            Err(GeorefError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_convergence_disabled() {
        let mut session = tatra_session();
        session.convergence = ConvergenceModel::None;
        let result = compute_georeference(&session).unwrap();
        assert_eq!(result.orientation.rotation, 0.0);
        assert_eq!(result.transform.b(), 0.0);
        assert_eq!(result.transform.d(), 0.0);
        assert_eq!(result.transform.a(), 0.1);
        assert_eq!(result.transform.e(), -0.1);
    }

    #[test]
    fn test_footprint_with_dimensions() {
        let mut session = tatra_session();
        session.image_dimensions = Some(ImageDimensions::new(4000, 3000));
        let result = compute_georeference(&session).unwrap();
        let footprint = result.footprint.unwrap();
        assert!(footprint.contains(session.anchor.unwrap()));
    }

    #[test]
    fn test_recomputation_is_deterministic() {
        let session = tatra_session();
        assert_eq!(
            compute_georeference(&session).unwrap(),
            compute_georeference(&session).unwrap()
        );
    }

    #[test]
    fn test_explicit_projector_sets_meridian_and_srs() {
        let mut session = tatra_session();
        session.anchor = Some(GeoAnchor::new(50.0, 16.0));
        session.image_dimensions = Some(ImageDimensions::new(4000, 3000));
        let projector = BuiltinProjector::from_epsg(32633).unwrap();

        let result = compute_with_projector(&session, &projector).unwrap();
        let expected_gamma = ((16.0f64 - 15.0) * 50.0f64.to_radians().sin()).to_radians();
        assert!((result.orientation.convergence - expected_gamma).abs() < 1e-12);
        assert!((result.orientation.convergence.to_degrees() - 0.766).abs() < 1e-3);
        assert!(result.commands.standard.contains("-a_srs \"EPSG:32633\""));
        assert!(!result.commands.standard.contains("EPSG:2180"));
        assert!(result.footprint.unwrap().contains(session.anchor.unwrap()));

        let solution = compute_transform(&session, &projector).unwrap();
        assert_eq!(solution.orientation, result.orientation);
        assert_eq!(solution.anchor_projected, result.anchor_projected);
    }

    #[test]
    fn test_compute_transform_with_explicit_projector() {
        let projector =
            CoordinateProjector::from_definition(&ProjectionDefinition::pl1992()).unwrap();
        let session = tatra_session();
        let solution = compute_transform(&session, &projector).unwrap();
        let full = compute_with_projector(&session, &projector).unwrap();
        assert_eq!(solution.transform, full.transform);
    }
}
