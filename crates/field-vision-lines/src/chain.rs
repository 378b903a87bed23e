//! Grouping scan points into lines.

use field_vision_core::{LinePoint, ScanDirection, VisualLine};
use nalgebra::Vector2;

use crate::LineParams;

/// Position along the scan sequence and across it.
#[inline]
fn along_across(p: &LinePoint, dir: ScanDirection) -> (i32, i32) {
    match dir {
        ScanDirection::Vertical => (p.x, p.y),
        ScanDirection::Horizontal => (p.y, p.x),
    }
}

struct Chain {
    points: Vec<LinePoint>,
}

impl Chain {
    /// Distance of `p` from where this chain expects its next point, or
    /// `None` if `p` cannot extend it.
    fn deviation(&self, p: &LinePoint, dir: ScanDirection, params: &LineParams) -> Option<f32> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        let (pa, pc) = along_across(p, dir);
        let (fa, fc) = along_across(first, dir);
        let (la, lc) = along_across(last, dir);

        let step = pa - la;
        let max_step = (params.scan_spacing.max(1) * params.max_scan_gap.max(1)) as i32;
        if step <= 0 || step > max_step {
            return None;
        }
        let (predicted, limit) = if la > fa {
            let slope = (lc - fc) as f32 / (la - fa) as f32;
            (lc as f32 + slope * step as f32, params.max_deviation)
        } else {
            (
                lc as f32,
                params.max_deviation + params.max_slope * step as f32,
            )
        };
        let dev = (pc as f32 - predicted).abs();
        (dev <= limit).then_some(dev)
    }

    fn is_closed(&self, along: i32, dir: ScanDirection, params: &LineParams) -> bool {
        let max_step = (params.scan_spacing.max(1) * params.max_scan_gap.max(1)) as i32;
        self.points
            .last()
            .is_some_and(|last| along - along_across(last, dir).0 > max_step)
    }
}

/// Chain points found by one scan direction into lines.
///
/// `points` must be in scan order. Each point joins the open chain that
/// predicts it best, or starts a new one. Chains with fewer than
/// `min_line_points` members are returned as unused points.
pub(crate) fn chain_points(
    points: &[LinePoint],
    dir: ScanDirection,
    params: &LineParams,
) -> (Vec<VisualLine>, Vec<LinePoint>) {
    let mut chains: Vec<Chain> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for p in points {
        let (along, _) = along_across(p, dir);
        open.retain(|&ci| !chains[ci].is_closed(along, dir, params));

        let mut best: Option<(usize, f32)> = None;
        for &ci in &open {
            if let Some(dev) = chains[ci].deviation(p, dir, params) {
                if best.is_none_or(|(_, d)| dev < d) {
                    best = Some((ci, dev));
                }
            }
        }
        match best {
            Some((ci, _)) => chains[ci].points.push(*p),
            None => {
                open.push(chains.len());
                chains.push(Chain { points: vec![*p] });
            }
        }
    }

    let mut lines = Vec::new();
    let mut unused = Vec::new();
    for chain in chains {
        if chain.points.len() >= params.min_line_points.max(2) {
            lines.extend(VisualLine::from_points(chain.points));
        } else {
            unused.extend(chain.points);
        }
    }
    (lines, unused)
}

fn collinear(a: &VisualLine, b: &VisualLine, params: &LineParams) -> bool {
    let (Some(da), Some(db)) = (a.direction(), b.direction()) else {
        return false;
    };
    if da.dot(&db).abs() < params.merge_angle.cos() {
        return false;
    }
    let origin = a.start.position();
    let normal = Vector2::new(-da.y, da.x);
    let off_line = |p: &LinePoint| normal.dot(&(p.position() - origin)).abs();
    if off_line(&b.start) > params.merge_distance || off_line(&b.end) > params.merge_distance {
        return false;
    }
    let t0 = da.dot(&(b.start.position() - origin));
    let t1 = da.dot(&(b.end.position() - origin));
    let (lo, hi) = (t0.min(t1), t0.max(t1));
    let gap = (lo - a.length()).max(-hi).max(0.0);
    gap <= params.merge_gap
}

/// Repeatedly merge collinear, nearby lines. Merged lines keep every point
/// of both parts and take the earlier line's position in the list.
pub(crate) fn merge_lines(mut lines: Vec<VisualLine>, params: &LineParams) -> Vec<VisualLine> {
    'restart: loop {
        for i in 0..lines.len() {
            for j in i + 1..lines.len() {
                if !collinear(&lines[i], &lines[j], params) {
                    continue;
                }
                let b = lines.remove(j);
                let mut points = std::mem::take(&mut lines[i].points);
                points.extend(b.points);
                if let Some(merged) = VisualLine::from_points(points) {
                    lines[i] = merged;
                }
                continue 'restart;
            }
        }
        return lines;
    }
}
