//! Color classification and frame thresholding.
//!
//! A [`ColorTable`] maps quantized `(y, u, v)` triples to a [`ColorClass`];
//! the [`Thresholder`] applies it to every pixel of a packed YUV 4:2:2 frame
//! and produces a [`ClassifiedMap`] with the same pixel grid.
//!
//! [`ColorClass`]: field_vision_core::ColorClass
//! [`ClassifiedMap`]: field_vision_core::ClassifiedMap

mod error;
mod table;
mod threshold;

pub use error::ThresholdError;
pub use table::{ColorTable, TableQuantization};
pub use threshold::{ThresholdParams, Thresholder};
