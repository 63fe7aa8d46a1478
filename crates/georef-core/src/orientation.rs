//! Rotation of the plan relative to the projection's grid north.
//!
//! Two effects are combined into one angle:
//!
//! 1. **Drawn north**: the plan's north arrow may not point straight up.
//!    Its bearing is measured clockwise from the image "up" direction
//!    (the negative-row axis).
//! 2. **Meridian convergence**: true north and grid north differ away from
//!    the projection's central meridian.
//!
//! ```text
//! rotation = -(arrow_angle + declination) + convergence
//! ```
//!
//! The result is in radians, positive = counter-clockwise in the projected
//! plane.

use serde::{Deserialize, Serialize};

use crate::error::{GeorefError, GeorefResult};
use crate::{GeoAnchor, PixelPoint};

/// Arrows shorter than this (in pixels) have no usable direction.
pub const MIN_ARROW_LENGTH: f64 = 1e-6;

/// How meridian convergence is evaluated at the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceModel {
    /// No correction; the plan is aligned to true north only.
    None,
    /// `(lon - lon0) * sin(lat)`, a small-angle approximation that is good
    /// near the central meridian.
    #[default]
    SmallAngle,
    /// `atan(tan(lon - lon0) * sin(lat))`, the spherical transverse
    /// Mercator expression.
    TransverseMercator,
}

/// Meridian convergence at a point, in radians.
///
/// Positive east of the central meridian (grid north lies west of true
/// north there, so the plan must turn counter-clockwise).
pub fn meridian_convergence(
    anchor: GeoAnchor,
    central_meridian_deg: f64,
    model: ConvergenceModel,
) -> f64 {
    let delta_lon_deg = anchor.longitude - central_meridian_deg;
    let sin_lat = anchor.latitude.to_radians().sin();

    match model {
        ConvergenceModel::None => 0.0,
        ConvergenceModel::SmallAngle => (delta_lon_deg * sin_lat).to_radians(),
        ConvergenceModel::TransverseMercator => {
            (delta_lon_deg.to_radians().tan() * sin_lat).atan()
        }
    }
}

/// Bearing of the arrow from `base` to `tip`, clockwise from image up.
///
/// An arrow pointing straight up is 0, pointing right is +π/2.
///
/// # Errors
///
/// Returns [`GeorefError::TransformComputation`] when base and tip coincide.
pub fn arrow_pixel_angle(base: PixelPoint, tip: PixelPoint) -> GeorefResult<f64> {
    let dx = tip.x - base.x;
    let dy = tip.y - base.y;

    if !(dx.is_finite() && dy.is_finite()) || dx.hypot(dy) < MIN_ARROW_LENGTH {
        return Err(GeorefError::TransformComputation(
            "north arrow base and tip coincide".to_string(),
        ));
    }

    // Rows grow downward, so "up" is -dy
    Ok(dx.atan2(-dy))
}

/// Everything the orientation stage needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationInput {
    /// Base and tip of the north arrow, or `None` when the plan's up is north
    pub north_arrow: Option<(PixelPoint, PixelPoint)>,
    /// Extra clockwise correction in degrees (e.g. magnetic declination)
    pub declination_deg: f64,
    /// Entrance position where convergence is evaluated
    pub anchor: GeoAnchor,
    /// Central meridian of the target projection in degrees
    pub central_meridian_deg: f64,
    pub convergence: ConvergenceModel,
}

/// Resolved orientation, with its parts kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Arrow bearing clockwise from image up (0 without an arrow)
    pub arrow_angle: f64,
    /// Manual correction in radians
    pub declination: f64,
    /// Meridian convergence at the anchor
    pub convergence: f64,
    /// Final counter-clockwise rotation
    pub rotation: f64,
}

impl Orientation {
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }
}

/// Combine arrow bearing, declination and convergence into one rotation.
pub fn resolve_orientation(input: &OrientationInput) -> GeorefResult<Orientation> {
    let arrow_angle = match input.north_arrow {
        Some((base, tip)) => arrow_pixel_angle(base, tip)?,
        None => 0.0,
    };
    let declination = input.declination_deg.to_radians();
    let convergence = meridian_convergence(
        input.anchor,
        input.central_meridian_deg,
        input.convergence,
    );

    let rotation = -(arrow_angle + declination) + convergence;
    if !rotation.is_finite() {
        return Err(GeorefError::TransformComputation(format!(
            "rotation angle is not finite (arrow {arrow_angle}, declination {declination}, convergence {convergence})"
        )));
    }

    log::debug!(
        "orientation: arrow {:.4} deg, declination {:.4} deg, convergence {:.4} deg -> rotation {:.4} deg",
        arrow_angle.to_degrees(),
        input.declination_deg,
        convergence.to_degrees(),
        rotation.to_degrees()
    );

    Ok(Orientation {
        arrow_angle,
        declination,
        convergence,
        rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-12;

    fn tatra_anchor() -> GeoAnchor {
        GeoAnchor::new(49.23833, 19.90069)
    }

    fn input(north_arrow: Option<(PixelPoint, PixelPoint)>) -> OrientationInput {
        OrientationInput {
            north_arrow,
            declination_deg: 0.0,
            anchor: tatra_anchor(),
            central_meridian_deg: 19.0,
            convergence: ConvergenceModel::SmallAngle,
        }
    }

    #[test]
    fn test_convergence_small_angle_tatra() {
        let gamma = meridian_convergence(tatra_anchor(), 19.0, ConvergenceModel::SmallAngle);
        let expected = (0.90069 * 49.23833f64.to_radians().sin()).to_radians();
        assert!((gamma - expected).abs() < EPS);
        assert!((gamma - 0.0119).abs() < 1e-4);
        assert!((gamma.to_degrees() - 0.68).abs() < 0.01);
    }

    #[test]
    fn test_convergence_zero_on_central_meridian() {
        let anchor = GeoAnchor::new(50.0, 19.0);
        for model in [
            ConvergenceModel::None,
            ConvergenceModel::SmallAngle,
            ConvergenceModel::TransverseMercator,
        ] {
            assert_eq!(meridian_convergence(anchor, 19.0, model), 0.0);
        }
    }

    #[test]
    fn test_convergence_sign_west_of_meridian() {
        let anchor = GeoAnchor::new(50.0, 17.0);
        assert!(meridian_convergence(anchor, 19.0, ConvergenceModel::SmallAngle) < 0.0);
    }

    #[test]
    fn test_convergence_models_agree_near_meridian() {
        let small = meridian_convergence(tatra_anchor(), 19.0, ConvergenceModel::SmallAngle);
        let tm = meridian_convergence(tatra_anchor(), 19.0, ConvergenceModel::TransverseMercator);
        assert!((small - tm).abs() < 1e-6);
    }

    #[test]
    fn test_convergence_disabled() {
        assert_eq!(
            meridian_convergence(tatra_anchor(), 19.0, ConvergenceModel::None),
            0.0
        );
    }

    #[test]
    fn test_arrow_angles() {
        let base = PixelPoint::new(100.0, 100.0);
        let up = arrow_pixel_angle(base, PixelPoint::new(100.0, 50.0)).unwrap();
        let right = arrow_pixel_angle(base, PixelPoint::new(150.0, 100.0)).unwrap();
        let down = arrow_pixel_angle(base, PixelPoint::new(100.0, 150.0)).unwrap();
        let left = arrow_pixel_angle(base, PixelPoint::new(50.0, 100.0)).unwrap();
        let up_right = arrow_pixel_angle(base, PixelPoint::new(150.0, 50.0)).unwrap();

        assert!(up.abs() < EPS);
        assert!((right - FRAC_PI_2).abs() < EPS);
        assert!((down.abs() - PI).abs() < EPS);
        assert!((left + FRAC_PI_2).abs() < EPS);
        assert!((up_right - FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn test_degenerate_arrow_rejected() {
        let p = PixelPoint::new(10.0, 10.0);
        assert!(matches!(
            arrow_pixel_angle(p, p),
            Err(GeorefError::TransformComputation(_))
        ));
    }

    #[test]
    fn test_no_arrow_rotation_equals_convergence() {
        let o = resolve_orientation(&input(None)).unwrap();
        assert_eq!(o.arrow_angle, 0.0);
        assert_eq!(o.rotation, o.convergence);
    }

    #[test]
    fn test_arrow_is_negated() {
        // Arrow tilted 90 degrees clockwise: the plan must turn counter-clockwise back
        let arrow = (PixelPoint::new(0.0, 0.0), PixelPoint::new(10.0, 0.0));
        let mut inp = input(Some(arrow));
        inp.convergence = ConvergenceModel::None;
        let o = resolve_orientation(&inp).unwrap();
        assert!((o.rotation + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_arrow_plus_convergence() {
        let arrow = (PixelPoint::new(0.0, 100.0), PixelPoint::new(100.0, 0.0));
        let o = resolve_orientation(&input(Some(arrow))).unwrap();
        assert!((o.rotation - (-FRAC_PI_4 + o.convergence)).abs() < EPS);
    }

    #[test]
    fn test_declination_added_clockwise() {
        let mut inp = input(None);
        inp.declination_deg = 5.0;
        let o = resolve_orientation(&inp).unwrap();
        assert!((o.rotation - (o.convergence - 5f64.to_radians())).abs() < EPS);
    }

    #[test]
    fn test_non_finite_anchor_rejected() {
        let mut inp = input(None);
        inp.anchor = GeoAnchor::new(f64::NAN, 19.0);
        assert!(matches!(
            resolve_orientation(&inp),
            Err(GeorefError::TransformComputation(_))
        ));
    }
}
