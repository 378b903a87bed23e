//! Camera placement from joint angles and torso attitude.

use nalgebra::{Isometry3, Rotation3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::{CameraCalibration, Joint, Sensor, SensorState};

/// Nominal body and camera geometry (centimetres, radians).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseParams {
    /// Horizontal field of view of the camera.
    pub horizontal_fov: f32,
    /// Fixed downward tilt of the camera in the head (0 for the top camera).
    pub camera_pitch: f32,
    pub camera_offset_x: f32,
    pub camera_offset_z: f32,
    /// Torso origin to head yaw axis.
    pub neck_offset_z: f32,
    /// Torso origin to hip pitch axis.
    pub hip_offset_z: f32,
    pub thigh_length: f32,
    pub tibia_length: f32,
    /// Ankle axis to sole.
    pub foot_height: f32,
    /// Use the inertial torso angles; otherwise the torso is assumed upright.
    pub use_inertial: bool,
}

impl Default for PoseParams {
    fn default() -> Self {
        Self {
            horizontal_fov: 46.4f32.to_radians(),
            camera_pitch: 0.0,
            camera_offset_x: 5.39,
            camera_offset_z: 6.79,
            neck_offset_z: 12.65,
            hip_offset_z: 8.5,
            thigh_length: 10.0,
            tibia_length: 10.29,
            foot_height: 4.519,
            use_inertial: true,
        }
    }
}

impl PoseParams {
    /// Pinhole focal length in pixels for an image `width` pixels wide.
    pub fn focal_length(&self, width: usize) -> f32 {
        0.5 * width as f32 / (0.5 * self.horizontal_fov).tan()
    }
}

/// Camera frame in the robot ground frame. Camera axes follow the robot
/// convention: x along the optical axis, y to the image left, z to the
/// image top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CameraPlacement {
    pub world_from_camera: Isometry3<f32>,
    pub body_height: f32,
}

pub(crate) fn camera_placement(
    state: &SensorState,
    calib: &CameraCalibration,
    params: &PoseParams,
) -> CameraPlacement {
    let attitude = if params.use_inertial {
        UnitQuaternion::from_euler_angles(
            state.sensor(Sensor::AngleX),
            state.sensor(Sensor::AngleY),
            0.0,
        )
    } else {
        UnitQuaternion::identity()
    };

    let leg = support_leg(state, params);
    let body_height = -(attitude * leg).z;
    let torso = Isometry3::from_parts(Translation3::new(0.0, 0.0, body_height), attitude);

    let head = Isometry3::from_parts(
        Translation3::new(0.0, 0.0, params.neck_offset_z + calib.neck_offset_z),
        UnitQuaternion::from_euler_angles(
            0.0,
            state.joint(Joint::HeadPitch) + calib.head_pitch,
            state.joint(Joint::HeadYaw) + calib.head_pan,
        ),
    );

    let mount = Isometry3::from_parts(
        Translation3::new(
            params.camera_offset_x + calib.camera_offset_x,
            calib.camera_offset_y,
            params.camera_offset_z + calib.camera_offset_z,
        ),
        UnitQuaternion::from_euler_angles(
            calib.camera_roll,
            params.camera_pitch + calib.camera_pitch,
            calib.camera_pan,
        ),
    );

    CameraPlacement {
        world_from_camera: torso * head * mount,
        body_height,
    }
}

/// Torso origin to sole of the loaded foot, in the torso frame.
fn support_leg(state: &SensorState, params: &PoseParams) -> Vector3<f32> {
    let (hip, knee, ankle) = if state.left_foot_pressure() >= state.right_foot_pressure() {
        (Joint::LHipPitch, Joint::LKneePitch, Joint::LAnklePitch)
    } else {
        (Joint::RHipPitch, Joint::RKneePitch, Joint::RAnklePitch)
    };
    let hip = state.joint(hip);
    let knee = hip + state.joint(knee);
    let ankle = knee + state.joint(ankle);

    let down = |angle: f32, length: f32| {
        Rotation3::from_axis_angle(&Vector3::y_axis(), angle) * Vector3::new(0.0, 0.0, -length)
    };

    Vector3::new(0.0, 0.0, -params.hip_offset_z)
        + down(hip, params.thigh_length)
        + down(knee, params.tibia_length)
        + down(ankle, params.foot_height)
}
