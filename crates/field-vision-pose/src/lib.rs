//! Pose model for a head-mounted camera on a legged robot.
//!
//! The model is fed one joint-angle vector and one sensor vector per frame
//! ([`PoseModel::update_sensors`]) and derives the camera's placement over the
//! ground. From that it answers geometry queries for the rest of the frame:
//! - pixel to field estimates at an assumed object height,
//! - the projected horizon,
//! - the expected image of the static field lines from a hypothesised
//!   robot position.
//!
//! Units are centimetres and radians. The robot frame has x forward, y left,
//! z up, with its origin on the ground below the torso.

mod calibration;
mod error;
mod expected;
mod field;
mod kinematics;
mod pose;
mod sensors;

pub use calibration::CameraCalibration;
pub use error::{PoseError, SensorVector};
pub use expected::EXPECTED_POINT_SPACING;
pub use field::{FieldLayout, FieldPose, FieldSegment};
pub use kinematics::PoseParams;
pub use pose::PoseModel;
pub use sensors::{Joint, Sensor, SensorState, NUM_JOINTS, NUM_SENSORS};
