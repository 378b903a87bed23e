use field_vision_core::BufferSizeError;

/// Which input vector failed an arity check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorVector {
    Joints,
    Sensors,
}

impl std::fmt::Display for SensorVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorVector::Joints => f.write_str("joint"),
            SensorVector::Sensors => f.write_str("sensor"),
        }
    }
}

/// Errors returned by the pose model.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    #[error("invalid {vector} vector arity (expected {expected}, got {got})")]
    InvalidSensorArity {
        vector: SensorVector,
        expected: usize,
        got: usize,
    },
    #[error("invalid calibration length (expected {expected}, got {got})")]
    InvalidCalibrationLength { expected: usize, got: usize },
    #[error("no ground solution for pixel ({x:.1}, {y:.1}) at height {height:.1}")]
    DegenerateProjection { x: f32, y: f32, height: f32 },
    #[error(transparent)]
    InvalidOutputBufferSize(#[from] BufferSizeError),
}
