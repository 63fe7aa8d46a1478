//! Calibration points marked on the plan.

use serde::{Deserialize, Serialize};

use crate::error::{GeorefError, GeorefResult};
use crate::{ImageDimensions, PixelPoint};

/// What a marked point stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationRole {
    /// Cave entrance, the geographic anchor.
    Entrance,
    /// First end of the scale bar.
    ScaleStart,
    /// Second end of the scale bar.
    ScaleEnd,
    /// Tail of the north arrow.
    NorthBase,
    /// Head of the north arrow.
    NorthTip,
}

impl CalibrationRole {
    /// All roles in marking order.
    pub const ALL: [CalibrationRole; 5] = [
        CalibrationRole::Entrance,
        CalibrationRole::ScaleStart,
        CalibrationRole::ScaleEnd,
        CalibrationRole::NorthBase,
        CalibrationRole::NorthTip,
    ];

    /// Roles needed for every computation.
    pub const REQUIRED: [CalibrationRole; 3] = [
        CalibrationRole::Entrance,
        CalibrationRole::ScaleStart,
        CalibrationRole::ScaleEnd,
    ];

    /// Roles needed only when the north arrow is used.
    pub const NORTH_ARROW: [CalibrationRole; 2] =
        [CalibrationRole::NorthBase, CalibrationRole::NorthTip];

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            CalibrationRole::Entrance => "entrance",
            CalibrationRole::ScaleStart => "scale start",
            CalibrationRole::ScaleEnd => "scale end",
            CalibrationRole::NorthBase => "north arrow base",
            CalibrationRole::NorthTip => "north arrow tip",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A single marked point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub role: CalibrationRole,
    /// Column in full-resolution pixels
    pub x: f64,
    /// Row in full-resolution pixels
    pub y: f64,
}

impl CalibrationPoint {
    pub fn new(role: CalibrationRole, x: f64, y: f64) -> Self {
        Self { role, x, y }
    }

    pub fn pixel(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }
}

/// Relation between a downscaled preview and the full-resolution raster.
///
/// Clicks arrive in display coordinates; the engine works in full-resolution
/// coordinates only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub display: ImageDimensions,
    pub full: ImageDimensions,
}

impl DisplayFrame {
    pub fn new(display: ImageDimensions, full: ImageDimensions) -> Self {
        Self { display, full }
    }

    /// A frame where the preview is shown at full resolution.
    pub fn identity(dimensions: ImageDimensions) -> Self {
        Self::new(dimensions, dimensions)
    }

    /// Map a display-space click to full-resolution pixel space.
    pub fn to_full(&self, x: f64, y: f64) -> GeorefResult<PixelPoint> {
        if self.display.is_empty() || self.full.is_empty() {
            return Err(GeorefError::InvalidScale(format!(
                "display frame {}x{} -> {}x{} has a zero dimension",
                self.display.width, self.display.height, self.full.width, self.full.height
            )));
        }

        let sx = self.full.width as f64 / self.display.width as f64;
        let sy = self.full.height as f64 / self.display.height as f64;
        Ok(PixelPoint::new(x * sx, y * sy))
    }
}

/// The set of points a user has marked, at most one per role.
///
/// Marking a role again replaces the previous point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CalibrationPoint>", into = "Vec<CalibrationPoint>")]
pub struct CalibrationPointStore {
    slots: [Option<PixelPoint>; 5],
}

impl CalibrationPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a point, returning the point it replaced (if any).
    pub fn set_point(&mut self, role: CalibrationRole, x: f64, y: f64) -> Option<PixelPoint> {
        self.slots[role.index()].replace(PixelPoint::new(x, y))
    }

    /// Mark a point captured on a downscaled preview.
    pub fn set_display_point(
        &mut self,
        role: CalibrationRole,
        x: f64,
        y: f64,
        frame: &DisplayFrame,
    ) -> GeorefResult<Option<PixelPoint>> {
        let full = frame.to_full(x, y)?;
        Ok(self.set_point(role, full.x, full.y))
    }

    pub fn get(&self, role: CalibrationRole) -> Option<PixelPoint> {
        self.slots[role.index()]
    }

    /// Remove a single point.
    pub fn remove(&mut self, role: CalibrationRole) -> Option<PixelPoint> {
        self.slots[role.index()].take()
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.slots = [None; 5];
    }

    /// Number of marked points.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Roles that still need a point, in marking order.
    pub fn missing_roles(&self, require_north_arrow: bool) -> Vec<CalibrationRole> {
        let arrow: &[CalibrationRole] = if require_north_arrow {
            &CalibrationRole::NORTH_ARROW
        } else {
            &[]
        };

        CalibrationRole::REQUIRED
            .iter()
            .chain(arrow)
            .copied()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    /// Check whether every role needed for a computation is marked.
    pub fn is_complete(&self, require_north_arrow: bool) -> bool {
        self.missing_roles(require_north_arrow).is_empty()
    }

    /// Fail with the full list of missing roles unless complete.
    pub fn ensure_complete(&self, require_north_arrow: bool) -> GeorefResult<()> {
        let missing = self.missing_roles(require_north_arrow);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GeorefError::Validation { missing })
        }
    }

    /// Get a point or fail naming its role.
    pub fn require(&self, role: CalibrationRole) -> GeorefResult<PixelPoint> {
        self.get(role)
            .ok_or_else(|| GeorefError::Validation { missing: vec![role] })
    }

    /// Base and tip of the north arrow, when both are marked.
    pub fn north_arrow(&self) -> Option<(PixelPoint, PixelPoint)> {
        match (
            self.get(CalibrationRole::NorthBase),
            self.get(CalibrationRole::NorthTip),
        ) {
            (Some(base), Some(tip)) => Some((base, tip)),
            _ => None,
        }
    }

    /// Marked points in role order.
    pub fn points(&self) -> impl Iterator<Item = CalibrationPoint> + '_ {
        CalibrationRole::ALL.iter().filter_map(|role| {
            self.get(*role)
                .map(|p| CalibrationPoint::new(*role, p.x, p.y))
        })
    }
}

impl From<Vec<CalibrationPoint>> for CalibrationPointStore {
    /// Later entries for the same role win, as with repeated clicks.
    fn from(points: Vec<CalibrationPoint>) -> Self {
        let mut store = CalibrationPointStore::new();
        for point in points {
            store.set_point(point.role, point.x, point.y);
        }
        store
    }
}

impl From<CalibrationPointStore> for Vec<CalibrationPoint> {
    fn from(store: CalibrationPointStore) -> Self {
        store.points().collect()
    }
}
