//! Line-colored runs crossed by regularly spaced scan lines.

use field_vision_core::{ClassifiedMap, Horizon, LinePoint, ScanDirection};

use crate::LineParams;

/// Points found by each scan direction, in scan order.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ScanPoints {
    /// Column-major: by x, then y.
    pub vertical: Vec<LinePoint>,
    /// Row-major: by y, then x.
    pub horizontal: Vec<LinePoint>,
}

impl ScanPoints {
    pub fn len(&self) -> usize {
        self.vertical.len() + self.horizontal.len()
    }
}

/// Scan every `scan_spacing`-th column and row below the vision horizon.
pub(crate) fn scan_points(
    map: &ClassifiedMap,
    horizon: &Horizon,
    params: &LineParams,
) -> ScanPoints {
    let spacing = params.scan_spacing.max(1);
    let first_row = horizon.vision_horizon.clamp(0, map.height as i32) as usize;
    let mut out = ScanPoints::default();

    for x in (0..map.width).step_by(spacing) {
        for_each_run(first_row, map.height, |y| map.get(x, y).is_line(), |start, len| {
            if accepted(len, params) {
                out.vertical.push(LinePoint::new(
                    x as i32,
                    (start + len / 2) as i32,
                    len as f32,
                    ScanDirection::Vertical,
                ));
            }
        });
    }

    for y in (first_row..map.height).step_by(spacing) {
        let row = map.row(y);
        for_each_run(0, map.width, |x| row[x].is_line(), |start, len| {
            if accepted(len, params) {
                out.horizontal.push(LinePoint::new(
                    (start + len / 2) as i32,
                    y as i32,
                    len as f32,
                    ScanDirection::Horizontal,
                ));
            }
        });
    }
    out
}

#[inline]
fn accepted(len: usize, params: &LineParams) -> bool {
    (params.min_line_width..=params.max_line_width).contains(&len)
}

/// Call `emit(start, len)` for each maximal run of `hit` in `from..to`.
fn for_each_run(
    from: usize,
    to: usize,
    hit: impl Fn(usize) -> bool,
    mut emit: impl FnMut(usize, usize),
) {
    let mut start = None;
    for i in from..to {
        match (hit(i), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                emit(s, i - s);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        emit(s, to - s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_vision_core::ColorClass;

    #[test]
    fn horizontal_band_is_crossed_by_vertical_scans() {
        let mut map = ClassifiedMap::filled(64, 48, ColorClass::Green);
        map.fill_rect(0, 20, 64, 24, ColorClass::White);
        let pts = scan_points(&map, &Horizon::level(0, 64, 48), &LineParams::default());
        assert_eq!(pts.vertical.len(), 16);
        assert!(pts.vertical.iter().all(|p| p.y == 22 && p.line_width == 4.0));
        // Row 20 is white edge to edge, too wide for a line crossing.
        assert!(pts.horizontal.is_empty());
    }

    #[test]
    fn nothing_above_the_vision_horizon() {
        let mut map = ClassifiedMap::filled(64, 48, ColorClass::Green);
        map.fill_rect(10, 5, 14, 15, ColorClass::White);
        let pts = scan_points(&map, &Horizon::level(20, 64, 48), &LineParams::default());
        assert_eq!(pts.len(), 0);

        let pts = scan_points(&map, &Horizon::level(0, 64, 48), &LineParams::default());
        assert!(pts.len() > 0);
        assert!(pts.horizontal.iter().all(|p| p.x == 12));
    }

    #[test]
    fn run_reaching_the_bottom_edge_is_closed() {
        let mut map = ClassifiedMap::filled(8, 20, ColorClass::Green);
        map.fill_rect(0, 17, 8, 20, ColorClass::White);
        let pts = scan_points(&map, &Horizon::level(0, 8, 20), &LineParams::default());
        assert_eq!(pts.vertical.len(), 2);
        assert_eq!(pts.vertical[0].line_width, 3.0);
        assert_eq!(pts.vertical[0].y, 18);
    }
}
