//! High-level facade crate for the `field-vision-*` workspace.
//!
//! This crate provides:
//! - re-exports of the stage crates (thresholding, pose, landmarks, lines)
//! - [`Vision`], the per-frame pipeline that owns the color table, the camera
//!   calibration and the pose, and turns one YUYV frame plus one set of joint
//!   and sensor readings into a [`FrameResult`]
//! - JSON configuration ([`VisionParams`]) and a flat, serializable
//!   [`FrameReport`] for downstream consumers.
//!
//! ## Quickstart
//!
//! ```
//! use field_vision::{Vision, VisionParams};
//! use field_vision::pose::{NUM_JOINTS, NUM_SENSORS};
//!
//! # fn main() -> Result<(), field_vision::VisionError> {
//! let params = VisionParams::default();
//! let mut vision = Vision::new(params)?;
//!
//! let frame = vec![0u8; vision.geometry().byte_size()];
//! let joints = [0.0f32; NUM_JOINTS];
//! let sensors = [0.0f32; NUM_SENSORS];
//! let result = vision.process_frame(&frame, &joints, &sensors)?;
//!
//! assert!(result.ball().is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `field_vision::core`: frames, color classes, the classified map and
//!   geometry records.
//! - `field_vision::threshold`: color tables and frame thresholding.
//! - `field_vision::pose`: sensors, calibration, horizon and pixel estimates.
//! - `field_vision::objects`: ball, goal and center cross detection.
//! - `field_vision::lines`: field line and corner detection.

pub use field_vision_core as core;
pub use field_vision_lines as lines;
pub use field_vision_objects as objects;
pub use field_vision_pose as pose;
pub use field_vision_threshold as threshold;

mod annotate;
mod error;
mod params;
mod pipeline;
mod result;

pub use error::{VisionError, VisionIoError};
pub use params::VisionParams;
pub use pipeline::Vision;
pub use result::{
    BallReport, CornerReport, FieldObjectReport, FrameReport, FrameResult, LineReport, PointReport,
};

pub use field_vision_core::{
    init_from_env, init_with_level, ClassifiedMap, ColorClass, Estimate, FrameGeometry, Horizon,
    VisualLine,
};
pub use field_vision_lines::{CornerShape, LineDetection, VisualCorner};
pub use field_vision_objects::{Landmark, LandmarkKind, LandmarkSet};
pub use field_vision_pose::CameraCalibration;
pub use field_vision_threshold::ColorTable;
