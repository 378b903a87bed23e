//! Expected image of the static field lines from a hypothesised robot pose.

use field_vision_core::{LinePoint, ScanDirection, VisualLine};
use nalgebra::{Point2, Point3};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{FieldPose, FieldSegment, PoseModel};

/// Segments are cut where they come closer than this to the camera plane.
const NEAR_PLANE: f32 = 1.0;

/// Pixel spacing of sampled points along an expected line.
pub const EXPECTED_POINT_SPACING: f32 = 5.0;

impl PoseModel {
    /// Lines the camera would see if the robot stood at `(x, y)` on the field
    /// facing `heading`, using the current sensor and calibration state.
    ///
    /// Segments entirely behind the camera or outside the frame are omitted.
    /// The result only depends on its inputs and the model state.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn predict_visual_lines(&self, x: f32, y: f32, heading: f32) -> Vec<VisualLine> {
        let pose = FieldPose::new(x, y, heading);
        let lines: Vec<VisualLine> = self
            .field()
            .segments
            .iter()
            .filter_map(|seg| self.expected_line(&pose, seg))
            .collect();
        log::trace!(
            "pose ({x:.0}, {y:.0}, {heading:.2}) expects {} of {} segments",
            lines.len(),
            self.field().segments.len()
        );
        lines
    }

    fn expected_line(&self, pose: &FieldPose, seg: &FieldSegment) -> Option<VisualLine> {
        let iso = self.world_from_camera();
        let to_camera = |p: Point2<f32>| {
            let r = pose.to_robot(p);
            iso.inverse_transform_point(&Point3::new(r.x, r.y, 0.0))
        };
        let (a, b) = clip_near(to_camera(seg.start), to_camera(seg.end))?;
        let a = self.project_camera(&a)?;
        let b = self.project_camera(&b)?;

        let geometry = self.geometry();
        let max = Point2::new(
            geometry.width as f32 - 1.0,
            geometry.height as f32 - 1.0,
        );
        let (a, b) = clip_to_rect(a, b, max)?;

        let d = b - a;
        let found_with = if d.x.abs() >= d.y.abs() {
            ScanDirection::Vertical
        } else {
            ScanDirection::Horizontal
        };
        let steps = (d.norm() / EXPECTED_POINT_SPACING).ceil().max(1.0) as usize;

        let mut points: Vec<LinePoint> = Vec::with_capacity(steps + 1);
        for k in 0..=steps {
            let p = a + d * (k as f32 / steps as f32);
            let (px, py) = (p.x.round() as i32, p.y.round() as i32);
            if points.last().is_some_and(|q| q.x == px && q.y == py) {
                continue;
            }
            let width = self.pixel_line_width(p.x, p.y);
            points.push(LinePoint::new(px, py, width, found_with));
        }
        VisualLine::from_points(points)
    }

    /// Painted line width in pixels at an image point on the ground.
    fn pixel_line_width(&self, x: f32, y: f32) -> f32 {
        // Depth is `t * focal`, so the projected width reduces to `w / t`.
        self.ray_to_plane(x, y, 0.0)
            .map_or(0.0, |(t, _)| self.field().line_width / t)
    }
}

/// Keep the part of a camera-frame segment in front of the near plane.
fn clip_near(a: Point3<f32>, b: Point3<f32>) -> Option<(Point3<f32>, Point3<f32>)> {
    match (a.x >= NEAR_PLANE, b.x >= NEAR_PLANE) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (a_in, _) => {
            let t = (NEAR_PLANE - a.x) / (b.x - a.x);
            let cut = a + (b - a) * t;
            if a_in {
                Some((a, cut))
            } else {
                Some((cut, b))
            }
        }
    }
}

/// Liang-Barsky clip of `a -> b` against `[0, max.x] × [0, max.y]`.
fn clip_to_rect(
    a: Point2<f32>,
    b: Point2<f32>,
    max: Point2<f32>,
) -> Option<(Point2<f32>, Point2<f32>)> {
    let d = b - a;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in [
        (-d.x, a.x),
        (d.x, max.x - a.x),
        (-d.y, a.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}
