//! Per-pixel frame classification.

use field_vision_core::{ClassifiedMap, DebugOverlay, FrameGeometry, YuvFrameView};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ColorTable, TableQuantization, ThresholdError};

/// Frame resolution and table quantization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdParams {
    #[serde(default)]
    pub geometry: FrameGeometry,
    #[serde(default)]
    pub quantization: TableQuantization,
}

/// Thresholding engine: owns the color table and the diagnostic overlay.
#[derive(Clone, Debug)]
pub struct Thresholder {
    geometry: FrameGeometry,
    table: ColorTable,
    overlay: DebugOverlay,
}

impl Thresholder {
    /// Start with an all-`Undefined` table.
    pub fn new(params: ThresholdParams) -> Result<Self, ThresholdError> {
        Self::with_table(params.geometry, ColorTable::new(params.quantization)?)
    }

    pub fn with_table(geometry: FrameGeometry, table: ColorTable) -> Result<Self, ThresholdError> {
        if !geometry.is_valid() {
            return Err(ThresholdError::InvalidGeometry(geometry));
        }
        Ok(Self {
            geometry,
            table,
            overlay: DebugOverlay::new(geometry.width, geometry.height),
        })
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    #[inline]
    pub fn table(&self) -> &ColorTable {
        &self.table
    }

    /// Replace the color table contents; see [`ColorTable::reload`].
    pub fn reload_table(&mut self, buffer: &[u8]) -> Result<(), ThresholdError> {
        self.table.reload(buffer)
    }

    pub fn set_table(&mut self, table: ColorTable) {
        self.table = table;
    }

    #[inline]
    pub fn overlay(&self) -> &DebugOverlay {
        &self.overlay
    }

    #[inline]
    pub fn overlay_mut(&mut self) -> &mut DebugOverlay {
        &mut self.overlay
    }

    /// Check a raw frame length against the configured resolution.
    pub fn check_frame<'a>(&self, frame: &'a [u8]) -> Result<YuvFrameView<'a>, ThresholdError> {
        YuvFrameView::new(self.geometry, frame).ok_or(ThresholdError::InvalidFrameSize {
            expected: self.geometry.byte_size(),
            got: frame.len(),
        })
    }

    /// Classify every pixel of `frame` into a fresh map.
    pub fn threshold(&mut self, frame: &[u8]) -> Result<ClassifiedMap, ThresholdError> {
        let mut map = ClassifiedMap::new(self.geometry.width, self.geometry.height);
        self.threshold_into(frame, &mut map)?;
        Ok(map)
    }

    /// Classify every pixel of `frame` into `out`, reusing its allocation.
    ///
    /// Clears the debug overlay first. On a size mismatch nothing is touched.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, out), fields(bytes = frame.len()))
    )]
    pub fn threshold_into(
        &mut self,
        frame: &[u8],
        out: &mut ClassifiedMap,
    ) -> Result<(), ThresholdError> {
        let view = self.check_frame(frame)?;
        let width = self.geometry.width;
        let height = self.geometry.height;
        if out.width != width || out.height != height {
            *out = ClassifiedMap::new(width, height);
        }
        self.overlay.clear();

        for (y, src) in view.rows().enumerate() {
            let dst = out.row_mut(y);
            for (pair, px) in src.chunks_exact(4).zip(dst.chunks_exact_mut(2)) {
                let (y0, u, y1, v) = (pair[0], pair[1], pair[2], pair[3]);
                px[0] = self.table.classify(y0, u, v);
                px[1] = self.table.classify(y1, u, v);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_vision_core::ColorClass;

    fn quant() -> TableQuantization {
        TableQuantization {
            y_bits: 4,
            u_bits: 4,
            v_bits: 4,
        }
    }

    /// Orange when u is high, green otherwise.
    fn table() -> ColorTable {
        ColorTable::from_fn(quant(), |_, qu, _| {
            if qu >= 12 {
                ColorClass::Orange
            } else {
                ColorClass::Green
            }
        })
        .expect("valid")
    }

    fn frame(geometry: FrameGeometry) -> Vec<u8> {
        let mut data = vec![0u8; geometry.byte_size()];
        for (i, pair) in data.chunks_exact_mut(4).enumerate() {
            pair[0] = 100;
            pair[1] = if i % 3 == 0 { 250 } else { 40 };
            pair[2] = 90;
            pair[3] = 128;
        }
        data
    }

    #[test]
    fn output_grid_matches_frame_grid() {
        let geometry = FrameGeometry::new(16, 6);
        let mut thresh = Thresholder::with_table(geometry, table()).expect("geometry");
        let data = frame(geometry);
        let map = thresh.threshold(&data).expect("sized");
        assert_eq!((map.width, map.height), (16, 6));

        let view = thresh.check_frame(&data).expect("view");
        for y in 0..geometry.height {
            for x in 0..geometry.width {
                let (yy, u, v) = view.yuv(x, y);
                assert_eq!(map.get(x, y), thresh.table().classify(yy, u, v));
            }
        }
        assert!(map.count(ColorClass::Orange) > 0);
    }

    #[test]
    fn checked_frame_borrows_the_input() {
        let geometry = FrameGeometry::new(8, 4);
        let thresh = Thresholder::with_table(geometry, table()).expect("geometry");
        let data = frame(geometry);
        let view = thresh.check_frame(&data).expect("sized");
        assert_eq!(view.geometry(), geometry);
        assert!(std::ptr::eq(view.data, data.as_slice()));
        assert_eq!(view.rows().count(), 4);
        assert!(thresh.check_frame(&data[..data.len() - 4]).is_err());
    }

    #[test]
    fn thresholding_twice_is_bit_identical() {
        let geometry = FrameGeometry::new(32, 8);
        let mut thresh = Thresholder::with_table(geometry, table()).expect("geometry");
        let data = frame(geometry);
        let a = thresh.threshold(&data).expect("sized");
        let b = thresh.threshold(&data).expect("sized");
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn wrong_frame_size_fails_without_output() {
        let geometry = FrameGeometry::new(16, 6);
        let mut thresh = Thresholder::with_table(geometry, table()).expect("geometry");
        let mut out = ClassifiedMap::filled(16, 6, ColorClass::Blue);
        let err = thresh
            .threshold_into(&vec![0u8; geometry.byte_size() - 2], &mut out)
            .unwrap_err();
        assert_eq!(
            err,
            ThresholdError::InvalidFrameSize {
                expected: 192,
                got: 190
            }
        );
        assert_eq!(out.count(ColorClass::Blue), 96);
        assert!(thresh.threshold(&[]).is_err());
    }

    #[test]
    fn thresholding_clears_overlay() {
        let geometry = FrameGeometry::new(8, 4);
        let mut thresh = Thresholder::with_table(geometry, table()).expect("geometry");
        thresh.overlay_mut().mark(2, 2, ColorClass::Red);
        thresh.threshold(&frame(geometry)).expect("sized");
        assert!(thresh.overlay().is_clear());
    }

    #[test]
    fn odd_width_is_rejected() {
        let params = ThresholdParams {
            geometry: FrameGeometry::new(15, 4),
            quantization: quant(),
        };
        assert!(matches!(
            Thresholder::new(params),
            Err(ThresholdError::InvalidGeometry(_))
        ));
    }
}
