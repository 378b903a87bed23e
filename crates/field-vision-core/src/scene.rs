//! Pixel-space and field-relative records produced by the detectors.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::BufferSizeError;

/// Which scan found a line point. Vertical scans cross horizontal-ish
/// lines and the other way round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanDirection {
    Horizontal,
    Vertical,
}

impl ScanDirection {
    /// Transport code: 0 horizontal, 1 vertical.
    pub fn code(self) -> u8 {
        match self {
            ScanDirection::Horizontal => 0,
            ScanDirection::Vertical => 1,
        }
    }
}

/// Center of a line-colored run crossed by a scan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: i32,
    pub y: i32,
    /// Run length along the scan, in pixels.
    pub line_width: f32,
    pub found_with: ScanDirection,
}

impl LinePoint {
    pub fn new(x: i32, y: i32, line_width: f32, found_with: ScanDirection) -> Self {
        Self {
            x,
            y,
            line_width,
            found_with,
        }
    }

    #[inline]
    pub fn position(&self) -> Point2<f32> {
        Point2::new(self.x as f32, self.y as f32)
    }
}

/// A field line in the image: its two endpoints and every point composing it,
/// ordered from `start` to `end`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualLine {
    pub start: LinePoint,
    pub end: LinePoint,
    pub points: Vec<LinePoint>,
}

impl VisualLine {
    /// Order `points` along their dominant image axis and take the extremes as
    /// endpoints. Returns `None` for an empty set.
    pub fn from_points(mut points: Vec<LinePoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |(a, b, c, d), p| (a.min(p.x), b.max(p.x), c.min(p.y), d.max(p.y)),
        );
        if max_x - min_x >= max_y - min_y {
            points.sort_by_key(|p| (p.x, p.y));
        } else {
            points.sort_by_key(|p| (p.y, p.x));
        }
        let start = *points.first()?;
        let end = *points.last()?;
        Some(Self { start, end, points })
    }

    pub fn length(&self) -> f32 {
        (self.end.position() - self.start.position()).norm()
    }

    /// Unit direction `start -> end`; `None` for a single-point line.
    pub fn direction(&self) -> Option<Vector2<f32>> {
        let d = self.end.position() - self.start.position();
        let n = d.norm();
        (n > f32::EPSILON).then(|| d / n)
    }
}

/// Projected field horizon: endpoints at the left and right image columns
/// plus the topmost row below which field features are searched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub left: Point2<i32>,
    pub right: Point2<i32>,
    pub vision_horizon: i32,
}

impl Horizon {
    /// A level horizon at row `y` spanning `width` columns.
    pub fn level(y: i32, width: usize, height: usize) -> Self {
        let right_x = width.saturating_sub(1) as i32;
        Self {
            left: Point2::new(0, y),
            right: Point2::new(right_x, y),
            vision_horizon: y.clamp(0, height as i32),
        }
    }

    /// Horizon row at column `x` (linear between the endpoints).
    pub fn y_at(&self, x: f32) -> f32 {
        let dx = (self.right.x - self.left.x) as f32;
        if dx.abs() < f32::EPSILON {
            return self.left.y as f32;
        }
        let t = (x - self.left.x as f32) / dx;
        self.left.y as f32 + t * (self.right.y - self.left.y) as f32
    }
}

/// Field-relative position of an image point at a known height.
///
/// Distances are centimetres on the ground plane from the robot origin,
/// angles are radians (bearing positive to the left).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub dist: f32,
    pub elevation: f32,
    pub bearing: f32,
    pub x: f32,
    pub y: f32,
}

impl Estimate {
    /// Returned when a pixel has no valid ground solution.
    pub const NULL: Estimate = Estimate {
        dist: 0.0,
        elevation: 0.0,
        bearing: 0.0,
        x: 0.0,
        y: 0.0,
    };

    /// Slots in the flat transport form.
    pub const LEN: usize = 5;

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// `[dist, elevation, bearing, x, y]`.
    pub fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.dist as f64,
            self.elevation as f64,
            self.bearing as f64,
            self.x as f64,
            self.y as f64,
        ]
    }

    /// Copy into a transport buffer of exactly [`Estimate::LEN`] slots.
    pub fn write_to(&self, out: &mut [f64]) -> Result<(), BufferSizeError> {
        if out.len() != Self::LEN {
            return Err(BufferSizeError {
                expected: Self::LEN,
                got: out.len(),
            });
        }
        out.copy_from_slice(&self.to_array());
        Ok(())
    }
}

/// Inverse projection from pixels to the field.
pub trait PixelEstimator {
    /// Estimate for the point at `pixel` assumed to lie `object_height` cm above
    /// the ground, or `None` when that ray never reaches the plane.
    fn estimate(&self, pixel: Point2<f32>, object_height: f32) -> Option<Estimate>;
}
