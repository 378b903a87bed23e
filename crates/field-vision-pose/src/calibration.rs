use field_vision_core::BufferSizeError;
use serde::{Deserialize, Serialize};

use crate::PoseError;

/// Corrections applied on top of the nominal head and camera geometry.
///
/// Angles are radians, offsets centimetres. All zeros means the nominal
/// robot. The flat form keeps the field order below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraCalibration {
    pub camera_roll: f32,
    pub camera_pitch: f32,
    pub camera_pan: f32,
    pub camera_offset_x: f32,
    pub camera_offset_y: f32,
    pub camera_offset_z: f32,
    pub head_pan: f32,
    pub head_pitch: f32,
    pub neck_offset_z: f32,
}

impl CameraCalibration {
    pub const LEN: usize = 9;

    pub fn from_array(v: [f32; Self::LEN]) -> Self {
        Self {
            camera_roll: v[0],
            camera_pitch: v[1],
            camera_pan: v[2],
            camera_offset_x: v[3],
            camera_offset_y: v[4],
            camera_offset_z: v[5],
            head_pan: v[6],
            head_pitch: v[7],
            neck_offset_z: v[8],
        }
    }

    pub fn to_array(&self) -> [f32; Self::LEN] {
        [
            self.camera_roll,
            self.camera_pitch,
            self.camera_pan,
            self.camera_offset_x,
            self.camera_offset_y,
            self.camera_offset_z,
            self.head_pan,
            self.head_pitch,
            self.neck_offset_z,
        ]
    }

    /// Parse exactly [`CameraCalibration::LEN`] values.
    pub fn from_slice(values: &[f32]) -> Result<Self, PoseError> {
        let arr: [f32; Self::LEN] =
            values
                .try_into()
                .map_err(|_| PoseError::InvalidCalibrationLength {
                    expected: Self::LEN,
                    got: values.len(),
                })?;
        Ok(Self::from_array(arr))
    }

    /// Copy into the first [`CameraCalibration::LEN`] slots of `out`.
    pub fn write_to(&self, out: &mut [f32]) -> Result<(), BufferSizeError> {
        let Some(dst) = out.get_mut(..Self::LEN) else {
            return Err(BufferSizeError {
                expected: Self::LEN,
                got: out.len(),
            });
        };
        dst.copy_from_slice(&self.to_array());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_order_matches_fields() {
        let calib = CameraCalibration::from_slice(&[1., 2., 3., 4., 5., 6., 7., 8., 9.])
            .expect("nine values");
        assert_eq!(calib.camera_pitch, 2.0);
        assert_eq!(calib.camera_offset_z, 6.0);
        assert_eq!(calib.neck_offset_z, 9.0);

        let mut out = [0.0f32; 12];
        calib.write_to(&mut out).expect("room");
        assert_eq!(&out[..9], &[1., 2., 3., 4., 5., 6., 7., 8., 9.]);
        assert_eq!(out[9], 0.0);
    }

    #[test]
    fn length_mismatches_are_reported() {
        assert_eq!(
            CameraCalibration::from_slice(&[0.0; 8]),
            Err(PoseError::InvalidCalibrationLength {
                expected: 9,
                got: 8
            })
        );
        let mut short = [0.0f32; 4];
        assert_eq!(
            CameraCalibration::default().write_to(&mut short),
            Err(BufferSizeError {
                expected: 9,
                got: 4
            })
        );
    }
}
