//! Hex RGB colors as entered by color pickers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// An opaque RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: HexColor = HexColor::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Combine with an opacity percentage into straight (non-premultiplied) RGBA.
    ///
    /// The percentage is clamped to `[0, 100]`; alpha is `round(opacity / 100 * 255)`.
    pub fn to_rgba8(self, opacity_percent: u8) -> [u8; 4] {
        [self.r, self.g, self.b, opacity_to_alpha(opacity_percent)]
    }
}

/// Convert an opacity percentage to an 8-bit alpha value.
pub fn opacity_to_alpha(opacity_percent: u8) -> u8 {
    let pct = opacity_percent.min(100) as u32;
    ((pct * 255 + 50) / 100) as u8
}

impl FromStr for HexColor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidColor {
            value: s.to_string(),
        };

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let channel =
                    |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::rgb(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!("#FF8000".parse::<HexColor>().unwrap(), HexColor::rgb(255, 128, 0));
        assert_eq!("#ff8000".parse::<HexColor>().unwrap(), HexColor::rgb(255, 128, 0));
        assert_eq!("#f80".parse::<HexColor>().unwrap(), HexColor::rgb(255, 136, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("FF8000".parse::<HexColor>().is_err());
        assert!("#GG0000".parse::<HexColor>().is_err());
        assert!("#12345".parse::<HexColor>().is_err());
        assert!("".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(HexColor::rgb(10, 171, 255).to_string(), "#0AABFF");
    }

    #[test]
    fn test_opacity_conversion() {
        assert_eq!(opacity_to_alpha(0), 0);
        assert_eq!(opacity_to_alpha(100), 255);
        assert_eq!(opacity_to_alpha(70), 179);
        assert_eq!(opacity_to_alpha(50), 128);
        assert_eq!(opacity_to_alpha(250), 255);
        assert_eq!(HexColor::BLACK.to_rgba8(70), [0, 0, 0, 179]);
    }
}
