//! Diagnostic markers drawn into the debug overlay.

use field_vision_core::{ColorClass, DebugOverlay, Horizon, LinePoint};
use field_vision_lines::LineDetection;
use field_vision_objects::{Landmark, LandmarkSet};

const BALL_MARK: ColorClass = ColorClass::Red;
const OBJECT_MARK: ColorClass = ColorClass::Navy;
const LINE_MARK: ColorClass = ColorClass::Blue;
const UNUSED_MARK: ColorClass = ColorClass::Red;
const CORNER_MARK: ColorClass = ColorClass::Orange;
const HORIZON_MARK: ColorClass = ColorClass::Yellow;

fn outline(overlay: &mut DebugOverlay, lm: &Landmark, class: ColorClass) {
    let q = &lm.quad;
    let left = q.top_left.x.min(q.bottom_left.x);
    let right = q.top_right.x.max(q.bottom_right.x);
    overlay.outline(left, q.top_left.y, right, q.bottom_left.y, class);
}

fn point(overlay: &mut DebugOverlay, p: &LinePoint, class: ColorClass) {
    overlay.mark(p.x, p.y, class);
}

/// Horizon row sampled per column; later marks draw over it.
fn horizon_line(overlay: &mut DebugOverlay, horizon: &Horizon) {
    for x in 0..overlay.width as i32 {
        let y = horizon.y_at(x as f32).round() as i32;
        overlay.mark(x, y, HORIZON_MARK);
    }
}

/// Draw the horizon, outline landmarks, dot line and unused points, and
/// cross corners.
pub(crate) fn annotate(
    overlay: &mut DebugOverlay,
    horizon: &Horizon,
    landmarks: &LandmarkSet,
    lines: &LineDetection,
) {
    horizon_line(overlay, horizon);
    if let Some(ball) = &landmarks.ball {
        outline(overlay, ball, BALL_MARK);
    }
    for lm in landmarks.field_objects() {
        outline(overlay, lm, OBJECT_MARK);
    }
    for p in lines.lines.iter().flat_map(|l| &l.points) {
        point(overlay, p, LINE_MARK);
    }
    for p in &lines.unused_points {
        point(overlay, p, UNUSED_MARK);
    }
    for c in &lines.corners {
        overlay.cross(c.image.x.round() as i32, c.image.y.round() as i32, 3, CORNER_MARK);
    }
}
