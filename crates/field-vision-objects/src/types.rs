use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::blob::Blob;

/// Semantic identity of a landmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    Ball,
    BlueGoalLeftPost,
    BlueGoalRightPost,
    YellowGoalLeftPost,
    YellowGoalRightPost,
    /// Blue post whose side could not be decided.
    BlueGoalPost,
    /// Yellow post whose side could not be decided.
    YellowGoalPost,
    BlueGoalCrossbar,
    YellowGoalCrossbar,
    CenterCross,
}

impl LandmarkKind {
    /// Field-object code. The ball travels on its own channel and has none.
    pub fn code(self) -> Option<u8> {
        let code = match self {
            LandmarkKind::Ball => return None,
            LandmarkKind::BlueGoalLeftPost => 40,
            LandmarkKind::BlueGoalRightPost => 41,
            LandmarkKind::YellowGoalLeftPost => 42,
            LandmarkKind::YellowGoalRightPost => 43,
            LandmarkKind::BlueGoalPost => 44,
            LandmarkKind::YellowGoalPost => 45,
            LandmarkKind::BlueGoalCrossbar => 47,
            LandmarkKind::YellowGoalCrossbar => 48,
            LandmarkKind::CenterCross => 50,
        };
        Some(code)
    }

    pub fn is_post(self) -> bool {
        matches!(
            self,
            LandmarkKind::BlueGoalLeftPost
                | LandmarkKind::BlueGoalRightPost
                | LandmarkKind::YellowGoalLeftPost
                | LandmarkKind::YellowGoalRightPost
                | LandmarkKind::BlueGoalPost
                | LandmarkKind::YellowGoalPost
        )
    }
}

/// Goal color. Each has its own set of post and crossbar identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalColor {
    Blue,
    Yellow,
}

impl GoalColor {
    pub(crate) fn left_post(self) -> LandmarkKind {
        match self {
            GoalColor::Blue => LandmarkKind::BlueGoalLeftPost,
            GoalColor::Yellow => LandmarkKind::YellowGoalLeftPost,
        }
    }

    pub(crate) fn right_post(self) -> LandmarkKind {
        match self {
            GoalColor::Blue => LandmarkKind::BlueGoalRightPost,
            GoalColor::Yellow => LandmarkKind::YellowGoalRightPost,
        }
    }

    pub(crate) fn generic_post(self) -> LandmarkKind {
        match self {
            GoalColor::Blue => LandmarkKind::BlueGoalPost,
            GoalColor::Yellow => LandmarkKind::YellowGoalPost,
        }
    }

    pub(crate) fn crossbar(self) -> LandmarkKind {
        match self {
            GoalColor::Blue => LandmarkKind::BlueGoalCrossbar,
            GoalColor::Yellow => LandmarkKind::YellowGoalCrossbar,
        }
    }
}

/// Four pixel corners of a landmark's outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkQuad {
    pub top_left: Point2<i32>,
    pub top_right: Point2<i32>,
    pub bottom_left: Point2<i32>,
    pub bottom_right: Point2<i32>,
}

impl LandmarkQuad {
    /// Axis-aligned box with inclusive corners.
    pub fn from_box(left: usize, top: usize, right: usize, bottom: usize) -> Self {
        let (l, t, r, b) = (left as i32, top as i32, right as i32, bottom as i32);
        Self {
            top_left: Point2::new(l, t),
            top_right: Point2::new(r, t),
            bottom_left: Point2::new(l, b),
            bottom_right: Point2::new(r, b),
        }
    }
}

/// A detected landmark. Every kind shares this payload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub kind: LandmarkKind,
    pub quad: LandmarkQuad,
    /// Inclusive pixel extent.
    pub width: f32,
    pub height: f32,
    /// Center of the extent, `(left + width/2, top + height/2)`.
    pub center: Point2<f32>,
}

impl Landmark {
    pub fn from_blob(kind: LandmarkKind, blob: &Blob) -> Self {
        Self::from_box(kind, blob.left, blob.top, blob.right, blob.bottom)
    }

    pub(crate) fn from_box(
        kind: LandmarkKind,
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
    ) -> Self {
        let width = (right - left + 1) as f32;
        let height = (bottom - top + 1) as f32;
        Self {
            kind,
            quad: LandmarkQuad::from_box(left, top, right, bottom),
            width,
            height,
            center: Point2::new(left as f32 + 0.5 * width, top as f32 + 0.5 * height),
        }
    }

    /// Half of the larger extent. Meaningful for the ball.
    pub fn radius(&self) -> f32 {
        0.5 * self.width.max(self.height)
    }

    /// Left edge of the extent.
    pub fn left(&self) -> f32 {
        self.quad.top_left.x.min(self.quad.bottom_left.x) as f32
    }
}

/// Post and crossbar slots for one goal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalLandmarks {
    pub left_post: Option<Landmark>,
    pub right_post: Option<Landmark>,
    pub crossbar: Option<Landmark>,
}

impl GoalLandmarks {
    pub fn is_empty(&self) -> bool {
        self.left_post.is_none() && self.right_post.is_none() && self.crossbar.is_none()
    }
}

/// Landmarks found in one frame, at most one per slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub ball: Option<Landmark>,
    pub blue_goal: GoalLandmarks,
    pub yellow_goal: GoalLandmarks,
    pub center_cross: Option<Landmark>,
}

impl LandmarkSet {
    /// Field objects in transport order: blue right post, blue left post,
    /// yellow right post, yellow left post, yellow crossbar, blue crossbar,
    /// center cross.
    pub fn field_objects(&self) -> impl Iterator<Item = &Landmark> + '_ {
        [
            &self.blue_goal.right_post,
            &self.blue_goal.left_post,
            &self.yellow_goal.right_post,
            &self.yellow_goal.left_post,
            &self.yellow_goal.crossbar,
            &self.blue_goal.crossbar,
            &self.center_cross,
        ]
        .into_iter()
        .flatten()
    }

    /// Ball followed by the field objects.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> + '_ {
        self.ball.iter().chain(self.field_objects())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ball acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallParams {
    /// Minimum pixel count of the ball region.
    pub min_area: usize,
    /// Minimum fraction of the bounding box covered by ball color.
    pub min_density: f32,
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            min_area: 6,
            min_density: 0.3,
        }
    }
}

/// Goal post and crossbar acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalParams {
    /// Regions smaller than this are ignored.
    pub min_area: usize,
    /// A column belongs to a post when at least this fraction of the region
    /// height is goal-colored in it.
    pub post_column_fill: f32,
    pub min_post_width: usize,
    pub min_post_height: usize,
    /// Minimum height / width of a post.
    pub min_post_aspect: f32,
    /// A row belongs to a crossbar when at least this fraction of the region
    /// width is goal-colored in it.
    pub crossbar_row_fill: f32,
    pub min_crossbar_width: usize,
    /// Minimum width / height of a crossbar.
    pub min_crossbar_aspect: f32,
}

impl Default for GoalParams {
    fn default() -> Self {
        Self {
            min_area: 24,
            post_column_fill: 0.6,
            min_post_width: 2,
            min_post_height: 12,
            min_post_aspect: 2.0,
            crossbar_row_fill: 0.6,
            min_crossbar_width: 20,
            min_crossbar_aspect: 2.0,
        }
    }
}

/// Center cross acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossParams {
    /// Bounding box side range, pixels.
    pub min_size: usize,
    pub max_size: usize,
    /// Larger over smaller bounding box side.
    pub max_aspect: f32,
    /// Painted fraction of the bounding box.
    pub min_fill: f32,
    pub max_fill: f32,
    /// Minimum field-colored fraction of the ring around the box.
    pub min_ring_field: f32,
}

impl Default for CrossParams {
    fn default() -> Self {
        Self {
            min_size: 3,
            max_size: 24,
            max_aspect: 2.0,
            min_fill: 0.2,
            max_fill: 0.75,
            min_ring_field: 0.6,
        }
    }
}

/// Parameters for [`crate::LandmarkDetector`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkParams {
    #[serde(default)]
    pub ball: BallParams,
    #[serde(default)]
    pub goal: GoalParams,
    #[serde(default)]
    pub cross: CrossParams,
}
