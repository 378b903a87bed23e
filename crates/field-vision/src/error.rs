use field_vision_core::BufferSizeError;
use field_vision_pose::PoseError;
use field_vision_threshold::ThresholdError;

/// Errors that abort a pipeline call.
///
/// Sizing and arity errors reject the whole frame; nothing is partially
/// updated when one is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VisionError {
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error(transparent)]
    Pose(#[from] PoseError),

    #[error("invalid output buffer size (expected {}, got {})", .0.expected, .0.got)]
    InvalidOutputBufferSize(#[from] BufferSizeError),
}

/// Errors from reading or writing JSON configuration and reports.
#[derive(thiserror::Error, Debug)]
pub enum VisionIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
