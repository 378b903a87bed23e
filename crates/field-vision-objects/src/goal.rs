//! Goal posts and crossbars from goal-colored regions.
//!
//! A goal seen whole is one connected region shaped like an upside-down U.
//! Posts are found as runs of well-filled columns, the crossbar as the
//! topmost band of well-filled rows. Side assignment:
//!
//! - two posts: the left one in the image is the left post;
//! - one post under a visible crossbar: the side of the crossbar it stands on;
//! - one post alone, or more than two: the color's generic post identity.
//!
//! A lone generic post takes the right-post slot.

use std::cmp::Reverse;

use nalgebra::Point2;

use crate::blob::{Blob, Run};
use crate::{GoalColor, GoalLandmarks, GoalParams, Landmark, LandmarkKind};

pub(crate) fn detect_goal(
    blobs: &[Blob],
    color: GoalColor,
    params: &GoalParams,
) -> GoalLandmarks {
    let mut posts = Vec::new();
    let mut crossbars = Vec::new();
    for blob in blobs.iter().filter(|b| b.area >= params.min_area) {
        let found = post_segments(blob, color, params);
        if let Some(bar) = crossbar(blob, !found.is_empty(), color, params) {
            crossbars.push(bar);
        }
        posts.extend(found);
    }

    let crossbar = crossbars.into_iter().min_by_key(|b| Reverse(b.width as usize));
    let (left_post, right_post) = assign_sides(posts, crossbar.as_ref(), color);
    log::trace!(
        "{color:?} goal: left {:?}, right {:?}, crossbar {}",
        left_post.map(|p| p.kind),
        right_post.map(|p| p.kind),
        crossbar.is_some()
    );
    GoalLandmarks {
        left_post,
        right_post,
        crossbar,
    }
}

/// Contiguous bands of columns filled over most of the region height.
fn post_segments(blob: &Blob, color: GoalColor, params: &GoalParams) -> Vec<Landmark> {
    let need = fill_threshold(params.post_column_fill, blob.height());
    let counts = blob.column_counts();

    let mut posts = Vec::new();
    let mut start = None;
    for (i, &count) in counts.iter().chain(std::iter::once(&0)).enumerate() {
        match (count >= need, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                let (x0, x1) = (blob.left + s, blob.left + i - 1);
                if let Some(post) = post_from_columns(blob, x0, x1, color, params) {
                    posts.push(post);
                }
                start = None;
            }
            _ => {}
        }
    }
    posts
}

fn post_from_columns(
    blob: &Blob,
    x0: usize,
    x1: usize,
    color: GoalColor,
    params: &GoalParams,
) -> Option<Landmark> {
    let clipped: Vec<Run> = blob.runs.iter().filter_map(|r| r.clip(x0, x1)).collect();
    let top = clipped.iter().map(|r| r.y).min()?;
    let bottom = clipped.iter().map(|r| r.y).max()?;

    let width = x1 - x0 + 1;
    let height = bottom - top + 1;
    if width < params.min_post_width
        || height < params.min_post_height
        || (height as f32) < params.min_post_aspect * width as f32
    {
        return None;
    }

    let row_extent = |y: usize| {
        clipped
            .iter()
            .filter(|r| r.y == y)
            .fold((usize::MAX, 0usize), |(a, b), r| (a.min(r.x0), b.max(r.x1)))
    };
    let (tl, tr) = row_extent(top);
    let (bl, br) = row_extent(bottom);

    let mut post = Landmark::from_box(color.generic_post(), x0, top, x1, bottom);
    post.quad.top_left = Point2::new(tl as i32, top as i32);
    post.quad.top_right = Point2::new(tr as i32, top as i32);
    post.quad.bottom_left = Point2::new(bl as i32, bottom as i32);
    post.quad.bottom_right = Point2::new(br as i32, bottom as i32);
    Some(post)
}

/// Topmost band of rows filled over most of the region width.
///
/// When the region also holds posts the band must be the thin top part,
/// not the whole region.
fn crossbar(
    blob: &Blob,
    has_posts: bool,
    color: GoalColor,
    params: &GoalParams,
) -> Option<Landmark> {
    let need = fill_threshold(params.crossbar_row_fill, blob.width());
    let counts = blob.row_counts();
    let first = counts.iter().position(|&c| c >= need)?;
    let len = counts[first..].iter().take_while(|&&c| c >= need).count();
    if has_posts && 2 * len > blob.height() {
        return None;
    }

    let (y0, y1) = (blob.top + first, blob.top + first + len - 1);
    let (x0, x1) = blob
        .runs
        .iter()
        .filter(|r| (y0..=y1).contains(&r.y))
        .fold((usize::MAX, 0usize), |(a, b), r| (a.min(r.x0), b.max(r.x1)));
    let width = x1 - x0 + 1;
    if width < params.min_crossbar_width
        || (width as f32) < params.min_crossbar_aspect * len as f32
    {
        return None;
    }
    Some(Landmark::from_box(color.crossbar(), x0, y0, x1, y1))
}

fn fill_threshold(fraction: f32, extent: usize) -> usize {
    ((fraction * extent as f32).ceil() as usize).max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Side of the crossbar a post stands under, if it stands under it at all.
fn side_under(post: &Landmark, bar: &Landmark) -> Option<Side> {
    let x = post.center.x;
    let reach = post.width;
    let bar_left = bar.left();
    let bar_right = bar_left + bar.width;
    if x < bar_left - reach || x > bar_right + reach {
        return None;
    }
    Some(if x < bar.center.x { Side::Left } else { Side::Right })
}

fn assign_sides(
    mut posts: Vec<Landmark>,
    crossbar: Option<&Landmark>,
    color: GoalColor,
) -> (Option<Landmark>, Option<Landmark>) {
    let with_kind = |mut p: Landmark, kind: LandmarkKind| {
        p.kind = kind;
        p
    };
    match posts.len() {
        0 => (None, None),
        1 => {
            let post = posts[0];
            match crossbar.and_then(|bar| side_under(&post, bar)) {
                Some(Side::Left) => (Some(with_kind(post, color.left_post())), None),
                Some(Side::Right) => (None, Some(with_kind(post, color.right_post()))),
                None => (None, Some(with_kind(post, color.generic_post()))),
            }
        }
        2 => {
            posts.sort_by(|a, b| a.center.x.total_cmp(&b.center.x));
            (
                Some(with_kind(posts[0], color.left_post())),
                Some(with_kind(posts[1], color.right_post())),
            )
        }
        n => {
            log::debug!("{n} {color:?} post candidates, keeping the two tallest as generic");
            posts.sort_by(|a, b| b.height.total_cmp(&a.height));
            posts.truncate(2);
            posts.sort_by(|a, b| a.center.x.total_cmp(&b.center.x));
            let generic = color.generic_post();
            (
                Some(with_kind(posts[0], generic)),
                Some(with_kind(posts[1], generic)),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::find_blobs;
    use field_vision_core::{ClassifiedMap, ColorClass};

    fn blue_goal(map: &ClassifiedMap) -> GoalLandmarks {
        let blobs = find_blobs(map, ColorClass::is_blue_goal);
        detect_goal(&blobs, GoalColor::Blue, &GoalParams::default())
    }

    fn paint_goal(map: &mut ClassifiedMap, class: ColorClass) {
        map.fill_rect(40, 60, 48, 150, class);
        map.fill_rect(200, 60, 208, 150, class);
        map.fill_rect(40, 60, 208, 68, class);
    }

    #[test]
    fn whole_goal_gives_both_posts_and_crossbar() {
        let mut map = ClassifiedMap::filled(320, 240, ColorClass::Green);
        paint_goal(&mut map, ColorClass::Blue);
        let goal = blue_goal(&map);

        let left = goal.left_post.expect("left post");
        let right = goal.right_post.expect("right post");
        assert_eq!(left.kind, LandmarkKind::BlueGoalLeftPost);
        assert_eq!(right.kind, LandmarkKind::BlueGoalRightPost);
        assert_eq!(left.quad.top_left, Point2::new(40, 60));
        assert_eq!(left.quad.bottom_right, Point2::new(47, 149));
        assert_eq!(right.width, 8.0);
        assert_eq!(right.height, 90.0);

        let bar = goal.crossbar.expect("crossbar");
        assert_eq!(bar.kind, LandmarkKind::BlueGoalCrossbar);
        assert_eq!(bar.width, 168.0);
        assert_eq!(bar.height, 8.0);
    }

    #[test]
    fn lone_post_without_crossbar_is_generic_in_right_slot() {
        let mut map = ClassifiedMap::filled(320, 240, ColorClass::Green);
        map.fill_rect(150, 40, 160, 200, ColorClass::Blue);
        let goal = blue_goal(&map);
        assert!(goal.left_post.is_none());
        assert!(goal.crossbar.is_none());
        assert_eq!(goal.right_post.map(|p| p.kind), Some(LandmarkKind::BlueGoalPost));
    }

    #[test]
    fn lone_post_under_crossbar_takes_its_side() {
        let mut map = ClassifiedMap::filled(320, 240, ColorClass::Green);
        // Right half of a goal: the bar runs off the left edge.
        map.fill_rect(0, 30, 250, 38, ColorClass::Blue);
        map.fill_rect(242, 30, 250, 180, ColorClass::Blue);
        let goal = blue_goal(&map);
        assert!(goal.left_post.is_none());
        assert_eq!(
            goal.right_post.map(|p| p.kind),
            Some(LandmarkKind::BlueGoalRightPost)
        );
        assert!(goal.crossbar.is_some());
    }

    #[test]
    fn crossbar_alone_is_reported() {
        let mut map = ClassifiedMap::filled(320, 240, ColorClass::Green);
        map.fill_rect(30, 20, 280, 28, ColorClass::Blue);
        let goal = blue_goal(&map);
        assert!(goal.left_post.is_none() && goal.right_post.is_none());
        assert_eq!(goal.crossbar.map(|b| b.width), Some(250.0));
    }

    #[test]
    fn many_posts_collapse_to_generic() {
        let mut map = ClassifiedMap::filled(320, 240, ColorClass::Green);
        map.fill_rect(20, 50, 26, 120, ColorClass::Blue);
        map.fill_rect(100, 40, 106, 200, ColorClass::Blue);
        map.fill_rect(220, 30, 226, 210, ColorClass::Blue);
        let goal = blue_goal(&map);
        let left = goal.left_post.expect("left slot");
        let right = goal.right_post.expect("right slot");
        assert_eq!(left.kind, LandmarkKind::BlueGoalPost);
        assert_eq!(right.kind, LandmarkKind::BlueGoalPost);
        // The short post at x=20 is dropped.
        assert_eq!(left.quad.top_left.x, 100);
        assert_eq!(right.quad.top_left.x, 220);
    }

    #[test]
    fn square_patch_is_neither_post_nor_crossbar() {
        let mut map = ClassifiedMap::filled(320, 240, ColorClass::Green);
        map.fill_rect(100, 100, 130, 130, ColorClass::Blue);
        assert!(blue_goal(&map).is_empty());
    }

    #[test]
    fn yellow_uses_its_own_codes() {
        let mut map = ClassifiedMap::filled(320, 240, ColorClass::Green);
        paint_goal(&mut map, ColorClass::YellowWhite);
        let blobs = find_blobs(&map, ColorClass::is_yellow_goal);
        let goal = detect_goal(&blobs, GoalColor::Yellow, &GoalParams::default());
        assert_eq!(
            goal.left_post.map(|p| p.kind),
            Some(LandmarkKind::YellowGoalLeftPost)
        );
        assert_eq!(
            goal.crossbar.map(|p| p.kind),
            Some(LandmarkKind::YellowGoalCrossbar)
        );
    }
}
