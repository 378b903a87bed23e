use std::cmp::Reverse;

use field_vision_core::ClassifiedMap;

use crate::blob::Blob;
use crate::{CrossParams, Landmark, LandmarkKind};

/// Small, compact, partly painted white mark sitting in open field.
pub(crate) fn detect_center_cross(
    map: &ClassifiedMap,
    white: &[Blob],
    params: &CrossParams,
) -> Option<Landmark> {
    white
        .iter()
        .filter(|b| is_cross_shaped(b, params))
        .filter(|b| ring_field_fraction(map, b) >= params.min_ring_field)
        .min_by_key(|b| Reverse(b.area))
        .map(|b| Landmark::from_blob(LandmarkKind::CenterCross, b))
}

fn is_cross_shaped(blob: &Blob, params: &CrossParams) -> bool {
    let (w, h) = (blob.width(), blob.height());
    let size_ok = |s: usize| (params.min_size..=params.max_size).contains(&s);
    if !size_ok(w) || !size_ok(h) {
        return false;
    }
    let aspect = w.max(h) as f32 / w.min(h) as f32;
    let fill = blob.density();
    aspect <= params.max_aspect && fill >= params.min_fill && fill <= params.max_fill
}

/// Fraction of field-colored pixels in a band around the bounding box.
/// Pixels outside the map are not counted.
fn ring_field_fraction(map: &ClassifiedMap, blob: &Blob) -> f32 {
    let margin = (blob.width().max(blob.height()) / 2).max(2) as i32;
    let (l, t) = (blob.left as i32, blob.top as i32);
    let (r, b) = (blob.right as i32, blob.bottom as i32);

    let mut total = 0usize;
    let mut field = 0usize;
    for y in t - margin..=b + margin {
        for x in l - margin..=r + margin {
            if (l..=r).contains(&x) && (t..=b).contains(&y) {
                continue;
            }
            if let Some(class) = map.get_checked(x, y) {
                total += 1;
                field += usize::from(class.is_field());
            }
        }
    }
    if total == 0 {
        return 0.0;
    }
    field as f32 / total as f32
}
