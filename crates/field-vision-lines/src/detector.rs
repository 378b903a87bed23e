use field_vision_core::{ClassifiedMap, Horizon, PixelEstimator, ScanDirection};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::chain::{chain_points, merge_lines};
use crate::corner::find_corners;
use crate::scan::scan_points;
use crate::{LineDetection, LineParams};

/// Field line and corner detector.
#[derive(Clone, Debug, Default)]
pub struct LineDetector {
    params: LineParams,
}

impl LineDetector {
    pub fn new(params: LineParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LineParams {
        &self.params
    }

    /// Detect lines below the vision horizon and classify their intersections.
    ///
    /// Every scanned point ends up either in exactly one line or in
    /// [`LineDetection::unused_points`]. Output order follows scan order, so
    /// identical inputs give identical results.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(vision_horizon = horizon.vision_horizon))
    )]
    pub fn detect<E: PixelEstimator + ?Sized>(
        &self,
        map: &ClassifiedMap,
        horizon: &Horizon,
        estimator: &E,
    ) -> LineDetection {
        let scanned = scan_points(map, horizon, &self.params);

        let (mut lines, mut unused_points) =
            chain_points(&scanned.vertical, ScanDirection::Vertical, &self.params);
        let (h_lines, h_unused) =
            chain_points(&scanned.horizontal, ScanDirection::Horizontal, &self.params);
        lines.extend(h_lines);
        unused_points.extend(h_unused);

        let lines = merge_lines(lines, &self.params);
        let corners = find_corners(&lines, estimator, &self.params);

        let result = LineDetection {
            lines,
            unused_points,
            corners,
            scanned_points: scanned.len(),
        };
        log::debug!(
            "lines: points={} lines={} unused={} corners={}",
            result.scanned_points,
            result.lines.len(),
            result.unused_points.len(),
            result.corners.len()
        );
        result
    }
}
