use serde::{Deserialize, Serialize};

use crate::ColorClass;

/// A caller-provided output buffer did not have the required length.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid output buffer size (expected {expected}, got {got})")]
pub struct BufferSizeError {
    pub expected: usize,
    pub got: usize,
}

/// Pixel grid of a camera frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: usize,
    pub height: usize,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
        }
    }
}

impl FrameGeometry {
    /// Packed YUV 4:2:2 carries two bytes per pixel.
    pub const BYTES_PER_PIXEL: usize = 2;

    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Expected raw frame length in bytes.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.pixel_count() * Self::BYTES_PER_PIXEL
    }

    /// Non-empty and an even width (chroma is shared by pixel pairs).
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.width % 2 == 0
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

/// Borrowed packed YUV 4:2:2 frame: `Y0 U Y1 V` for every horizontal pixel pair,
/// rows stored top to bottom.
#[derive(Clone, Copy, Debug)]
pub struct YuvFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl<'a> YuvFrameView<'a> {
    /// Wrap `data` if its length matches `geometry`.
    pub fn new(geometry: FrameGeometry, data: &'a [u8]) -> Option<Self> {
        if !geometry.is_valid() || data.len() != geometry.byte_size() {
            return None;
        }
        Some(Self {
            width: geometry.width,
            height: geometry.height,
            data,
        })
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(self.width, self.height)
    }

    /// `(y, u, v)` of one pixel.
    #[inline]
    pub fn yuv(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let pair = (y * self.width + (x & !1)) * FrameGeometry::BYTES_PER_PIXEL;
        let luma = if x & 1 == 0 {
            self.data[pair]
        } else {
            self.data[pair + 2]
        };
        (luma, self.data[pair + 1], self.data[pair + 3])
    }

    /// Packed rows, top to bottom; each holds `width / 2` `Y0 U Y1 V` groups.
    #[inline]
    pub fn rows(&self) -> std::slice::ChunksExact<'a, u8> {
        self.data.chunks_exact(self.width * FrameGeometry::BYTES_PER_PIXEL)
    }
}

/// One semantic color class per pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedMap {
    pub width: usize,
    pub height: usize,
    data: Vec<ColorClass>,
}

impl ClassifiedMap {
    /// A map where every pixel is `Undefined`.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, ColorClass::Undefined)
    }

    pub fn filled(width: usize, height: usize, class: ColorClass) -> Self {
        Self {
            width,
            height,
            data: vec![class; width * height],
        }
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(self.width, self.height)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> ColorClass {
        self.data[y * self.width + x]
    }

    /// Bounds-checked lookup with signed coordinates.
    #[inline]
    pub fn get_checked(&self, x: i32, y: i32) -> Option<ColorClass> {
        if !self.geometry().contains(x, y) {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, class: ColorClass) {
        self.data[y * self.width + x] = class;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[ColorClass] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [ColorClass] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn data(&self) -> &[ColorClass] {
        &self.data
    }

    /// Paint the half-open rectangle `[x0, x1) × [y0, y1)`, clipped to the map.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, class: ColorClass) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, class);
            }
        }
    }

    /// Number of pixels carrying `class`.
    pub fn count(&self, class: ColorClass) -> usize {
        self.data.iter().filter(|&&c| c == class).count()
    }

    /// Dense row-major byte codes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().map(|c| c.code()).collect()
    }

    /// Copy byte codes into `out`, letting set overlay pixels win.
    ///
    /// `out` must hold exactly `width * height` bytes.
    pub fn composite_into(
        &self,
        overlay: Option<&DebugOverlay>,
        out: &mut [u8],
    ) -> Result<(), BufferSizeError> {
        if out.len() != self.data.len() {
            return Err(BufferSizeError {
                expected: self.data.len(),
                got: out.len(),
            });
        }
        let marks = overlay.filter(|o| o.width == self.width && o.height == self.height);
        for (idx, (dst, class)) in out.iter_mut().zip(&self.data).enumerate() {
            let mark = marks.and_then(|o| o.data[idx]);
            *dst = mark.unwrap_or(*class).code();
        }
        Ok(())
    }
}

/// Annotation layer drawn on top of a classified map for diagnostics.
///
/// Unset pixels show the classified color; set pixels replace it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugOverlay {
    pub width: usize,
    pub height: usize,
    data: Vec<Option<ColorClass>>,
}

impl DebugOverlay {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![None; width * height],
        }
    }

    /// Reset every pixel. Must run before each frame so no stale marks survive.
    pub fn clear(&mut self) {
        self.data.fill(None);
    }

    /// Resize (and clear) to a new grid.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, None);
    }

    pub fn is_clear(&self) -> bool {
        self.data.iter().all(Option::is_none)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<ColorClass> {
        self.data[y * self.width + x]
    }

    /// Mark a pixel; coordinates outside the grid are ignored.
    #[inline]
    pub fn mark(&mut self, x: i32, y: i32, class: ColorClass) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.data[y as usize * self.width + x as usize] = Some(class);
    }

    /// Outline the inclusive box `(x0, y0)..=(x1, y1)`.
    pub fn outline(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, class: ColorClass) {
        for x in x0..=x1 {
            self.mark(x, y0, class);
            self.mark(x, y1, class);
        }
        for y in y0..=y1 {
            self.mark(x0, y, class);
            self.mark(x1, y, class);
        }
    }

    /// Small plus-shaped marker centered on a pixel.
    pub fn cross(&mut self, x: i32, y: i32, arm: i32, class: ColorClass) {
        for d in -arm..=arm {
            self.mark(x + d, y, class);
            self.mark(x, y + d, class);
        }
    }
}
