//! Landmark detection for the field vision pipeline.
//!
//! The detector groups classified pixels into connected regions (runs joined
//! with union-find) and keeps at most one landmark per semantic slot:
//! the ball, left/right post and crossbar of each goal, and the center cross.
//!
//! ```
//! use field_vision_core::{ClassifiedMap, ColorClass};
//! use field_vision_objects::{LandmarkDetector, LandmarkParams};
//!
//! let mut map = ClassifiedMap::filled(320, 240, ColorClass::Green);
//! map.fill_rect(100, 50, 120, 60, ColorClass::Orange);
//!
//! let set = LandmarkDetector::new(LandmarkParams::default()).detect(&map);
//! let ball = set.ball.unwrap();
//! assert_eq!((ball.center.x, ball.center.y), (110.0, 55.0));
//! ```

mod ball;
mod blob;
mod cross;
mod detector;
mod goal;
mod types;

pub use blob::{find_blobs, Blob, Run};
pub use detector::LandmarkDetector;
pub use types::{
    BallParams, CrossParams, GoalColor, GoalLandmarks, GoalParams, Landmark, LandmarkKind,
    LandmarkParams, LandmarkQuad, LandmarkSet,
};
