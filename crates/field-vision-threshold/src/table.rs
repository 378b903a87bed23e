//! Dense `(y, u, v)` color lookup table.

use field_vision_core::ColorClass;
use serde::{Deserialize, Serialize};

use crate::ThresholdError;

/// Significant bits kept from each channel when indexing the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuantization {
    pub y_bits: u8,
    pub u_bits: u8,
    pub v_bits: u8,
}

impl Default for TableQuantization {
    fn default() -> Self {
        Self {
            y_bits: 7,
            u_bits: 7,
            v_bits: 7,
        }
    }
}

impl TableQuantization {
    pub fn is_valid(&self) -> bool {
        [self.y_bits, self.u_bits, self.v_bits]
            .iter()
            .all(|b| (1..=8).contains(b))
    }

    #[inline]
    pub fn y_len(&self) -> usize {
        1 << self.y_bits
    }

    #[inline]
    pub fn u_len(&self) -> usize {
        1 << self.u_bits
    }

    #[inline]
    pub fn v_len(&self) -> usize {
        1 << self.v_bits
    }

    /// Number of entries a full table holds.
    #[inline]
    pub fn volume(&self) -> usize {
        self.y_len() * self.u_len() * self.v_len()
    }

    /// Table index of a raw pixel.
    #[inline]
    pub fn index(&self, y: u8, u: u8, v: u8) -> usize {
        let qy = (y >> (8 - self.y_bits)) as usize;
        let qu = (u >> (8 - self.u_bits)) as usize;
        let qv = (v >> (8 - self.v_bits)) as usize;
        (qy * self.u_len() + qu) * self.v_len() + qv
    }

    fn check(&self) -> Result<(), ThresholdError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ThresholdError::InvalidQuantization {
                y_bits: self.y_bits,
                u_bits: self.u_bits,
                v_bits: self.v_bits,
            })
        }
    }
}

/// Color classifier: one [`ColorClass`] per quantized `(y, u, v)` cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    quantization: TableQuantization,
    entries: Vec<ColorClass>,
}

impl ColorTable {
    /// A table where every cell is `Undefined`.
    pub fn new(quantization: TableQuantization) -> Result<Self, ThresholdError> {
        quantization.check()?;
        Ok(Self {
            quantization,
            entries: vec![ColorClass::Undefined; quantization.volume()],
        })
    }

    /// Build a table from a flat byte buffer (`(y * u_len + u) * v_len + v` order).
    pub fn from_buffer(
        quantization: TableQuantization,
        buffer: &[u8],
    ) -> Result<Self, ThresholdError> {
        let mut table = Self::new(quantization)?;
        table.reload(buffer)?;
        Ok(table)
    }

    /// Build a table by evaluating `f(qy, qu, qv)` on every quantized cell.
    pub fn from_fn(
        quantization: TableQuantization,
        mut f: impl FnMut(usize, usize, usize) -> ColorClass,
    ) -> Result<Self, ThresholdError> {
        quantization.check()?;
        let mut entries = Vec::with_capacity(quantization.volume());
        for qy in 0..quantization.y_len() {
            for qu in 0..quantization.u_len() {
                for qv in 0..quantization.v_len() {
                    entries.push(f(qy, qu, qv));
                }
            }
        }
        Ok(Self {
            quantization,
            entries,
        })
    }

    #[inline]
    pub fn quantization(&self) -> TableQuantization {
        self.quantization
    }

    /// Expected reload buffer length.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.quantization.volume()
    }

    /// Replace every entry from `buffer`.
    ///
    /// The length is checked before anything is written, so a rejected buffer
    /// leaves the current table in place. Bytes that are not a known class
    /// code load as `Undefined`.
    pub fn reload(&mut self, buffer: &[u8]) -> Result<(), ThresholdError> {
        let expected = self.byte_size();
        if buffer.len() != expected {
            log::warn!(
                "rejecting color table reload: {} bytes, expected {}",
                buffer.len(),
                expected
            );
            return Err(ThresholdError::InvalidTableSize {
                expected,
                got: buffer.len(),
            });
        }
        let entries: Vec<ColorClass> = buffer.iter().map(|&b| ColorClass::from_code(b)).collect();
        self.entries = entries;
        log::info!("color table reloaded ({} entries)", expected);
        Ok(())
    }

    #[inline]
    pub fn classify(&self, y: u8, u: u8, v: u8) -> ColorClass {
        self.entries[self.quantization.index(y, u, v)]
    }

    /// Entries as table bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries.iter().map(|c| c.code()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TableQuantization {
        TableQuantization {
            y_bits: 3,
            u_bits: 4,
            v_bits: 2,
        }
    }

    #[test]
    fn index_follows_y_u_v_nesting() {
        let q = small();
        assert_eq!(q.volume(), 8 * 16 * 4);
        assert_eq!(q.index(0, 0, 0), 0);
        assert_eq!(q.index(0, 0, 255), 3);
        assert_eq!(q.index(0, 255, 0), 15 * 4);
        assert_eq!(q.index(255, 0, 0), 7 * 16 * 4);
        assert_eq!(q.index(255, 255, 255), q.volume() - 1);
    }

    #[test]
    fn classify_is_total_after_reload() {
        let q = small();
        let buffer: Vec<u8> = (0..q.volume()).map(|i| (i % 13) as u8).collect();
        let table = ColorTable::from_buffer(q, &buffer).expect("sized");
        for y in 0..=255u8 {
            for u in (0..=255u8).step_by(17) {
                for v in (0..=255u8).step_by(5) {
                    let class = table.classify(y, u, v);
                    let code = buffer[q.index(y, u, v)];
                    let expected = if code <= 11 {
                        ColorClass::from_code(code)
                    } else {
                        ColorClass::Undefined
                    };
                    assert_eq!(class, expected);
                }
            }
        }
    }

    #[test]
    fn wrong_size_reload_keeps_previous_table() {
        let q = small();
        let mut table = ColorTable::from_fn(q, |_, qu, _| {
            if qu < 8 {
                ColorClass::Green
            } else {
                ColorClass::Orange
            }
        })
        .expect("valid");
        let before = table.clone();

        let err = table.reload(&vec![1u8; q.volume() - 1]).unwrap_err();
        assert_eq!(
            err,
            ThresholdError::InvalidTableSize {
                expected: q.volume(),
                got: q.volume() - 1
            }
        );
        assert_eq!(table, before);
        assert_eq!(table.classify(10, 0, 0), ColorClass::Green);
        assert_eq!(table.classify(10, 200, 0), ColorClass::Orange);
    }

    #[test]
    fn fresh_table_is_undefined() {
        let table = ColorTable::new(small()).expect("valid");
        assert_eq!(table.classify(128, 128, 128), ColorClass::Undefined);
    }

    #[test]
    fn rejects_out_of_range_bits() {
        let q = TableQuantization {
            y_bits: 0,
            u_bits: 7,
            v_bits: 9,
        };
        assert!(matches!(
            ColorTable::new(q),
            Err(ThresholdError::InvalidQuantization { .. })
        ));
    }
}
