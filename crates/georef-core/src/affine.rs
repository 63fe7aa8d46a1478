//! Pixel-to-map affine transform.
//!
//! ```text
//! easting  = A * col + B * row + C
//! northing = D * col + E * row + F
//! ```
//!
//! The linear part is an isotropic scale plus a rotation, with the row axis
//! flipped because image rows grow downward while northing grows upward:
//!
//! ```text
//! A =  m * cos(θ)    B = m * sin(θ)
//! D =  m * sin(θ)    E = -m * cos(θ)
//! ```
//!
//! The translation is back-solved from the entrance so that the transform
//! reproduces the entrance's projected coordinate exactly.

use serde::{Deserialize, Serialize};

use crate::error::{GeorefError, GeorefResult};
use crate::{PixelPoint, ProjectedPoint};

/// A point known both in pixel space and in projected space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorTie {
    pub pixel: PixelPoint,
    pub projected: ProjectedPoint,
}

/// Affine transformation coefficients.
///
/// Always derived from current inputs; there is no way to edit a single
/// coefficient of an existing transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl AffineTransform {
    /// Build from raw coefficients, e.g. read back from a world file.
    pub fn from_coefficients(
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> GeorefResult<Self> {
        let transform = Self { a, b, c, d, e, f };
        transform.ensure_finite()?;
        Ok(transform)
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn e(&self) -> f64 {
        self.e
    }

    pub fn f(&self) -> f64 {
        self.f
    }

    /// Coefficients in world-file line order: A, D, B, E, C, F.
    pub fn world_file_order(&self) -> [f64; 6] {
        [self.a, self.d, self.b, self.e, self.c, self.f]
    }

    /// Map a pixel coordinate to projected space.
    pub fn apply(&self, pixel: PixelPoint) -> ProjectedPoint {
        ProjectedPoint::new(
            self.a * pixel.x + self.b * pixel.y + self.c,
            self.d * pixel.x + self.e * pixel.y + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// Ground size of one pixel along the column axis.
    pub fn pixel_size(&self) -> f64 {
        self.a.hypot(self.d)
    }

    /// Counter-clockwise rotation encoded in the linear part.
    pub fn rotation(&self) -> f64 {
        self.d.atan2(self.a)
    }

    /// Inverse mapping, projected space to pixel space.
    ///
    /// The inverse is an ordinary affine transform, not necessarily of the
    /// scale-rotation form.
    pub fn inverse(&self) -> GeorefResult<AffineTransform> {
        let det = self.determinant();
        if !det.is_finite() || det == 0.0 {
            return Err(GeorefError::TransformComputation(format!(
                "transform is not invertible (determinant {det})"
            )));
        }

        let a = self.e / det;
        let b = -self.b / det;
        let d = -self.d / det;
        let e = self.a / det;
        let c = -(a * self.c + b * self.f);
        let f = -(d * self.c + e * self.f);
        AffineTransform::from_coefficients(a, b, c, d, e, f)
    }

    /// Map a projected coordinate back to pixel space.
    pub fn to_pixel(&self, point: ProjectedPoint) -> GeorefResult<PixelPoint> {
        let inv = self.inverse()?;
        let p = inv.apply(PixelPoint::new(point.easting, point.northing));
        Ok(PixelPoint::new(p.easting, p.northing))
    }

    fn ensure_finite(&self) -> GeorefResult<()> {
        let named = [
            ("A", self.a),
            ("B", self.b),
            ("C", self.c),
            ("D", self.d),
            ("E", self.e),
            ("F", self.f),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(GeorefError::TransformComputation(format!(
                    "coefficient {name} is not finite ({value})"
                )));
            }
        }
        Ok(())
    }
}

/// Compose scale, rotation and anchor into a transform.
///
/// # Arguments
///
/// * `meters_per_pixel` - Ground size of one pixel
/// * `rotation` - Counter-clockwise rotation in radians
/// * `anchor` - Entrance in both pixel and projected coordinates
///
/// # Errors
///
/// Returns [`GeorefError::TransformComputation`] when any input or
/// coefficient is not finite.
pub fn build_affine(
    meters_per_pixel: f64,
    rotation: f64,
    anchor: AnchorTie,
) -> GeorefResult<AffineTransform> {
    if !meters_per_pixel.is_finite() || !rotation.is_finite() {
        return Err(GeorefError::TransformComputation(format!(
            "scale ({meters_per_pixel}) and rotation ({rotation}) must be finite"
        )));
    }
    if !anchor.pixel.is_finite() || !anchor.projected.is_finite() {
        return Err(GeorefError::TransformComputation(
            "anchor coordinates must be finite".to_string(),
        ));
    }

    let (sin, cos) = rotation.sin_cos();
    let a = meters_per_pixel * cos;
    let b = meters_per_pixel * sin;
    let d = meters_per_pixel * sin;
    let e = -meters_per_pixel * cos;

    let PixelPoint { x, y } = anchor.pixel;
    let c = anchor.projected.easting - a * x - b * y;
    let f = anchor.projected.northing - d * x - e * y;

    AffineTransform::from_coefficients(a, b, c, d, e, f)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
