//! Field line and corner detection for the field vision pipeline.
//!
//! Scans run every few columns (crossing horizontal-ish lines) and every few
//! rows (crossing vertical-ish lines) below the vision horizon. Line-colored
//! runs of plausible width become [`LinePoint`](field_vision_core::LinePoint)s,
//! which are chained per scan direction, merged across directions when
//! collinear, and intersected pairwise into typed corners. Points that join
//! no line are reported as unused.

mod chain;
mod corner;
mod detector;
mod scan;
mod types;

pub use detector::LineDetector;
pub use types::{CornerShape, LineDetection, LineParams, VisualCorner};
