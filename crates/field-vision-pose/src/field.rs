//! Static field-line layout.

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// Robot pose on the field: position in field centimetres, heading in radians
/// (0 faces along +x).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPose {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
}

impl FieldPose {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    /// Express a field point in this robot's ground frame.
    pub fn to_robot(&self, p: Point2<f32>) -> Point2<f32> {
        let rel: Vector2<f32> = p - Point2::new(self.x, self.y);
        Point2::from(Rotation2::new(-self.heading) * rel)
    }
}

/// One straight painted line, field coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSegment {
    pub start: Point2<f32>,
    pub end: Point2<f32>,
}

impl FieldSegment {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            start: Point2::new(x0, y0),
            end: Point2::new(x1, y1),
        }
    }
}

/// Painted lines of the playing field. Circles are stored as polygons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Painted line thickness.
    pub line_width: f32,
    pub segments: Vec<FieldSegment>,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::standard()
    }
}

impl FieldLayout {
    /// 6 m × 4 m lined area inside a 70 cm green border, origin at the
    /// carpet corner, goals on the short sides.
    pub fn standard() -> Self {
        const BORDER: f32 = 70.0;
        const LENGTH: f32 = 600.0;
        const WIDTH: f32 = 400.0;
        const BOX_DEPTH: f32 = 60.0;
        const BOX_WIDTH: f32 = 300.0;
        const CIRCLE_RADIUS: f32 = 62.5;
        const CIRCLE_SIDES: usize = 16;

        let (x0, x1) = (BORDER, BORDER + LENGTH);
        let (y0, y1) = (BORDER, BORDER + WIDTH);
        let mid_x = BORDER + 0.5 * LENGTH;
        let mid_y = BORDER + 0.5 * WIDTH;
        let box_y0 = mid_y - 0.5 * BOX_WIDTH;
        let box_y1 = mid_y + 0.5 * BOX_WIDTH;

        let mut segments = vec![
            FieldSegment::new(x0, y0, x1, y0),
            FieldSegment::new(x1, y0, x1, y1),
            FieldSegment::new(x1, y1, x0, y1),
            FieldSegment::new(x0, y1, x0, y0),
            FieldSegment::new(mid_x, y0, mid_x, y1),
            FieldSegment::new(x0, box_y0, x0 + BOX_DEPTH, box_y0),
            FieldSegment::new(x0 + BOX_DEPTH, box_y0, x0 + BOX_DEPTH, box_y1),
            FieldSegment::new(x0 + BOX_DEPTH, box_y1, x0, box_y1),
            FieldSegment::new(x1, box_y0, x1 - BOX_DEPTH, box_y0),
            FieldSegment::new(x1 - BOX_DEPTH, box_y0, x1 - BOX_DEPTH, box_y1),
            FieldSegment::new(x1 - BOX_DEPTH, box_y1, x1, box_y1),
        ];

        let step = std::f32::consts::TAU / CIRCLE_SIDES as f32;
        for k in 0..CIRCLE_SIDES {
            let (s0, c0) = (k as f32 * step).sin_cos();
            let (s1, c1) = ((k + 1) as f32 * step).sin_cos();
            segments.push(FieldSegment::new(
                mid_x + CIRCLE_RADIUS * c0,
                mid_y + CIRCLE_RADIUS * s0,
                mid_x + CIRCLE_RADIUS * c1,
                mid_y + CIRCLE_RADIUS * s1,
            ));
        }

        Self {
            line_width: 5.0,
            segments,
        }
    }
}
