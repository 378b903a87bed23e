use field_vision_core::FrameGeometry;

/// Errors returned by table loading and thresholding.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("invalid color table size (expected {expected} bytes, got {got})")]
    InvalidTableSize { expected: usize, got: usize },
    #[error("invalid table quantization (y={y_bits}, u={u_bits}, v={v_bits} bits; each must be 1..=8)")]
    InvalidQuantization { y_bits: u8, u_bits: u8, v_bits: u8 },
    #[error("invalid frame size (expected {expected} bytes, got {got})")]
    InvalidFrameSize { expected: usize, got: usize },
    #[error("invalid frame geometry {}x{} (width must be even and non-zero)", .0.width, .0.height)]
    InvalidGeometry(FrameGeometry),
}
