//! Core types shared by the field vision pipeline.
//!
//! This crate holds the data that flows between stages: borrowed raw frames,
//! semantic color classes, the per-pixel classified map with its debug
//! overlay, and the pixel/field geometry records (line points, lines,
//! horizon, estimates). It does not classify, detect or project anything.

mod color;
mod image;
mod logger;
mod scene;

pub use color::ColorClass;
pub use image::{BufferSizeError, ClassifiedMap, DebugOverlay, FrameGeometry, YuvFrameView};
pub use scene::{Estimate, Horizon, LinePoint, PixelEstimator, ScanDirection, VisualLine};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};
