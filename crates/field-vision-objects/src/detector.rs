use field_vision_core::{ClassifiedMap, ColorClass};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::ball::detect_ball;
use crate::blob::find_blobs;
use crate::cross::detect_center_cross;
use crate::goal::detect_goal;
use crate::{GoalColor, LandmarkParams, LandmarkSet};

/// Landmark detector over a classified map.
#[derive(Clone, Debug, Default)]
pub struct LandmarkDetector {
    params: LandmarkParams,
}

impl LandmarkDetector {
    pub fn new(params: LandmarkParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LandmarkParams {
        &self.params
    }

    /// Find at most one landmark per slot. Missing objects are simply absent.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(width = map.width, height = map.height))
    )]
    pub fn detect(&self, map: &ClassifiedMap) -> LandmarkSet {
        let ball = detect_ball(&find_blobs(map, ColorClass::is_ball), &self.params.ball);
        let blue_goal = detect_goal(
            &find_blobs(map, ColorClass::is_blue_goal),
            GoalColor::Blue,
            &self.params.goal,
        );
        let yellow_goal = detect_goal(
            &find_blobs(map, ColorClass::is_yellow_goal),
            GoalColor::Yellow,
            &self.params.goal,
        );
        let center_cross = detect_center_cross(
            map,
            &find_blobs(map, ColorClass::is_line),
            &self.params.cross,
        );

        let set = LandmarkSet {
            ball,
            blue_goal,
            yellow_goal,
            center_cross,
        };
        log::debug!(
            "landmarks: ball={} field_objects={}",
            set.ball.is_some(),
            set.field_objects().count()
        );
        set
    }
}
