use std::cmp::Reverse;

use crate::blob::Blob;
use crate::{BallParams, Landmark, LandmarkKind};

/// Largest ball-colored region that is dense enough to be round.
///
/// `blobs` must be in raster order; equal areas keep the earlier region.
pub(crate) fn detect_ball(blobs: &[Blob], params: &BallParams) -> Option<Landmark> {
    blobs
        .iter()
        .filter(|b| b.area >= params.min_area && b.density() >= params.min_density)
        .min_by_key(|b| Reverse(b.area))
        .map(|b| Landmark::from_blob(LandmarkKind::Ball, b))
}
