//! Geographic footprint of a georeferenced plan and its KML ground overlay.

use serde::{Deserialize, Serialize};

use crate::affine::AffineTransform;
use crate::error::{GeorefError, GeorefResult};
use crate::projection::Projector;
use crate::{GeoAnchor, ImageDimensions, PixelPoint, ProjectedPoint};

/// Where the plan's raster lands on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Projected image corners: top-left, top-right, bottom-right, bottom-left
    pub corners: [ProjectedPoint; 4],
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Footprint {
    /// Map the outer pixel edges through the transform and back to WGS84.
    pub fn compute(
        transform: &AffineTransform,
        dimensions: ImageDimensions,
        projector: &dyn Projector,
    ) -> GeorefResult<Self> {
        if dimensions.is_empty() {
            return Err(GeorefError::TransformComputation(format!(
                "image {}x{} has no area",
                dimensions.width, dimensions.height
            )));
        }

        let w = dimensions.width as f64;
        let h = dimensions.height as f64;
        let corners = [
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(w, 0.0),
            PixelPoint::new(w, h),
            PixelPoint::new(0.0, h),
        ]
        .map(|p| transform.apply(p));

        let mut footprint = Self {
            corners,
            north: f64::NEG_INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            west: f64::INFINITY,
        };
        for corner in corners {
            let g = projector.unproject(corner)?;
            footprint.north = footprint.north.max(g.latitude);
            footprint.south = footprint.south.min(g.latitude);
            footprint.east = footprint.east.max(g.longitude);
            footprint.west = footprint.west.min(g.longitude);
        }
        Ok(footprint)
    }

    pub fn contains(&self, point: GeoAnchor) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// KML document with a single `GroundOverlay` covering the footprint.
///
/// `href` is written as given; a bare file name resolves next to the KML.
pub fn render_ground_overlay(name: &str, href: &str, footprint: &Footprint) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <GroundOverlay>
      <name>{name}</name>
      <Icon>
        <href>{href}</href>
      </Icon>
      <LatLonBox>
        <north>{north:.9}</north>
        <south>{south:.9}</south>
        <east>{east:.9}</east>
        <west>{west:.9}</west>
      </LatLonBox>
    </GroundOverlay>
  </Document>
</kml>
"#,
        name = escape_xml(name),
        href = escape_xml(href),
        north = footprint.north,
        south = footprint.south,
        east = footprint.east,
        west = footprint.west,
    )
}
