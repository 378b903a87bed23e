//! Corner classification of line intersections.

use field_vision_core::{Estimate, LinePoint, PixelEstimator, VisualLine};
use nalgebra::{Point2, Vector2};

use crate::{CornerShape, LineParams, VisualCorner};

/// Where an intersection falls on one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Contact {
    Start,
    End,
    Inside,
}

fn contact(t: f32, length: f32, tol: f32) -> Option<Contact> {
    if t < -tol || t > length + tol {
        None
    } else if t <= tol {
        Some(Contact::Start)
    } else if t >= length - tol {
        Some(Contact::End)
    } else {
        Some(Contact::Inside)
    }
}

#[inline]
fn cross(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Endpoint of `line` away from the contacted end.
fn far_end(line: &VisualLine, at: Contact) -> LinePoint {
    match at {
        Contact::Start => line.end,
        _ => line.start,
    }
}

/// Intersection of two lines and its shape, if they meet within tolerance.
pub(crate) fn classify(
    a: &VisualLine,
    b: &VisualLine,
    params: &LineParams,
) -> Option<(Point2<f32>, CornerShape)> {
    let da = a.direction()?;
    let db = b.direction()?;
    let angle = da.dot(&db).abs().clamp(0.0, 1.0).acos();
    if angle < params.min_corner_angle {
        return None;
    }
    let denom = cross(da, db);
    if denom.abs() < f32::EPSILON {
        return None;
    }
    let (a0, b0) = (a.start.position(), b.start.position());
    let s = cross(b0 - a0, db) / denom;
    let u = cross(b0 - a0, da) / denom;
    let vertex = a0 + da * s;

    let tol = params.corner_tolerance;
    let ca = contact(s, a.length(), tol)?;
    let cb = contact(u, b.length(), tol)?;
    let shape = match (ca, cb) {
        (Contact::Inside, Contact::Inside) => CornerShape::X,
        (Contact::Inside, _) | (_, Contact::Inside) => CornerShape::T,
        (ea, eb) => {
            // Image y grows toward the robot.
            let opens_down = [far_end(a, ea), far_end(b, eb)]
                .iter()
                .all(|p| p.y as f32 >= vertex.y - 1.0);
            if opens_down {
                CornerShape::InnerL
            } else {
                CornerShape::OuterL
            }
        }
    };
    Some((vertex, shape))
}

/// Corners between every pair of lines, located on the ground through
/// `estimator`. A vertex without a ground solution keeps its image position
/// and carries [`Estimate::NULL`].
pub(crate) fn find_corners<E: PixelEstimator + ?Sized>(
    lines: &[VisualLine],
    estimator: &E,
    params: &LineParams,
) -> Vec<VisualCorner> {
    let mut corners = Vec::new();
    for i in 0..lines.len() {
        for j in i + 1..lines.len() {
            let Some((image, shape)) = classify(&lines[i], &lines[j], params) else {
                continue;
            };
            let estimate = estimator.estimate(image, 0.0).unwrap_or_else(|| {
                log::debug!(
                    "{shape:?} corner at ({:.1}, {:.1}) has no ground solution",
                    image.x,
                    image.y
                );
                Estimate::NULL
            });
            corners.push(VisualCorner {
                image,
                estimate,
                shape,
                lines: [i, j],
            });
        }
    }
    corners
}
