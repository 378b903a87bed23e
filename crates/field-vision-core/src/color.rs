use serde::{Deserialize, Serialize};

/// Semantic color class assigned to a thresholded pixel.
///
/// The byte codes are stable: they are what a color table stores and what a
/// classified map exports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ColorClass {
    #[default]
    Undefined = 0,
    White = 1,
    Green = 2,
    Blue = 3,
    Yellow = 4,
    Orange = 5,
    YellowWhite = 6,
    BlueGreen = 7,
    OrangeRed = 8,
    OrangeYellow = 9,
    Red = 10,
    Navy = 11,
}

impl ColorClass {
    pub const ALL: [ColorClass; 12] = [
        ColorClass::Undefined,
        ColorClass::White,
        ColorClass::Green,
        ColorClass::Blue,
        ColorClass::Yellow,
        ColorClass::Orange,
        ColorClass::YellowWhite,
        ColorClass::BlueGreen,
        ColorClass::OrangeRed,
        ColorClass::OrangeYellow,
        ColorClass::Red,
        ColorClass::Navy,
    ];

    /// Decode a table byte. Unknown codes are treated as `Undefined`.
    #[inline]
    pub fn from_code(code: u8) -> Self {
        Self::ALL
            .get(code as usize)
            .copied()
            .unwrap_or(ColorClass::Undefined)
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Field line paint.
    #[inline]
    pub fn is_line(self) -> bool {
        self == ColorClass::White
    }

    #[inline]
    pub fn is_ball(self) -> bool {
        matches!(
            self,
            ColorClass::Orange | ColorClass::OrangeRed | ColorClass::OrangeYellow
        )
    }

    #[inline]
    pub fn is_blue_goal(self) -> bool {
        matches!(self, ColorClass::Blue | ColorClass::BlueGreen)
    }

    #[inline]
    pub fn is_yellow_goal(self) -> bool {
        matches!(self, ColorClass::Yellow | ColorClass::YellowWhite)
    }

    #[inline]
    pub fn is_field(self) -> bool {
        matches!(self, ColorClass::Green | ColorClass::BlueGreen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_code() {
        for class in ColorClass::ALL {
            assert_eq!(ColorClass::from_code(class.code()), class);
        }
    }

    #[test]
    fn unknown_codes_are_undefined() {
        assert_eq!(ColorClass::from_code(12), ColorClass::Undefined);
        assert_eq!(ColorClass::from_code(255), ColorClass::Undefined);
    }
}
