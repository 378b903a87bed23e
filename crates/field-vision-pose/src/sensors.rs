use crate::{PoseError, SensorVector};

/// Joints in transport order.
pub const NUM_JOINTS: usize = 22;

/// Canonical sensor vector length. Older frame formats send fewer values.
pub const NUM_SENSORS: usize = 22;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Joint {
    HeadYaw = 0,
    HeadPitch,
    LShoulderPitch,
    LShoulderRoll,
    LElbowYaw,
    LElbowRoll,
    LHipYawPitch,
    LHipRoll,
    LHipPitch,
    LKneePitch,
    LAnklePitch,
    LAnkleRoll,
    RHipYawPitch,
    RHipRoll,
    RHipPitch,
    RKneePitch,
    RAnklePitch,
    RAnkleRoll,
    RShoulderPitch,
    RShoulderRoll,
    RElbowYaw,
    RElbowRoll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Sensor {
    LFsrFrontLeft = 0,
    LFsrFrontRight,
    LFsrRearLeft,
    LFsrRearRight,
    RFsrFrontLeft,
    RFsrFrontRight,
    RFsrRearLeft,
    RFsrRearRight,
    LFootBumperLeft,
    LFootBumperRight,
    RFootBumperLeft,
    RFootBumperRight,
    AccX,
    AccY,
    AccZ,
    GyrX,
    GyrY,
    AngleX,
    AngleY,
    UltraSoundLeft,
    UltraSoundRight,
    Battery,
}

/// Joint angles and sensor readings for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorState {
    pub joints: [f32; NUM_JOINTS],
    pub sensors: [f32; NUM_SENSORS],
}

impl Default for SensorState {
    fn default() -> Self {
        Self {
            joints: [0.0; NUM_JOINTS],
            sensors: [0.0; NUM_SENSORS],
        }
    }
}

impl SensorState {
    /// Build from transport slices.
    ///
    /// `joints` must have exactly [`NUM_JOINTS`] values. `sensors` may be
    /// shorter than [`NUM_SENSORS`]; missing trailing values read as `0.0`.
    pub fn from_slices(joints: &[f32], sensors: &[f32]) -> Result<Self, PoseError> {
        if joints.len() != NUM_JOINTS {
            return Err(PoseError::InvalidSensorArity {
                vector: SensorVector::Joints,
                expected: NUM_JOINTS,
                got: joints.len(),
            });
        }
        if sensors.len() > NUM_SENSORS {
            return Err(PoseError::InvalidSensorArity {
                vector: SensorVector::Sensors,
                expected: NUM_SENSORS,
                got: sensors.len(),
            });
        }
        if sensors.len() < NUM_SENSORS {
            log::debug!(
                "sensor vector has {} of {} values, zero-filling the rest",
                sensors.len(),
                NUM_SENSORS
            );
        }

        let mut state = SensorState::default();
        state.joints.copy_from_slice(joints);
        state.sensors[..sensors.len()].copy_from_slice(sensors);
        Ok(state)
    }

    #[inline]
    pub fn joint(&self, joint: Joint) -> f32 {
        self.joints[joint as usize]
    }

    #[inline]
    pub fn sensor(&self, sensor: Sensor) -> f32 {
        self.sensors[sensor as usize]
    }

    pub fn left_foot_pressure(&self) -> f32 {
        self.sensors[Sensor::LFsrFrontLeft as usize..=Sensor::LFsrRearRight as usize]
            .iter()
            .sum()
    }

    pub fn right_foot_pressure(&self) -> f32 {
        self.sensors[Sensor::RFsrFrontLeft as usize..=Sensor::RFsrRearRight as usize]
            .iter()
            .sum()
    }
}
