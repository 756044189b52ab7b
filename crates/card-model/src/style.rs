//! Subtitle card style.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::ModelError;

/// Font weight offered by the style editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FontWeight {
    Regular,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
}

impl FontWeight {
    pub const ALL: [FontWeight; 5] = [
        FontWeight::Regular,
        FontWeight::Medium,
        FontWeight::SemiBold,
        FontWeight::Bold,
        FontWeight::ExtraBold,
    ];

    /// CSS/OpenType numeric weight.
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Medium => 500,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
            FontWeight::ExtraBold => 800,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FontWeight::Regular => "Regular",
            FontWeight::Medium => "Medium",
            FontWeight::SemiBold => "SemiBold",
            FontWeight::Bold => "Bold",
            FontWeight::ExtraBold => "ExtraBold",
        }
    }
}

impl FromStr for FontWeight {
    type Err = ModelError;

    /// Accepts the numeric token ("700") or the label ("Bold", any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        FontWeight::ALL
            .into_iter()
            .find(|w| w.value().to_string() == token || w.label().eq_ignore_ascii_case(token))
            .ok_or_else(|| ModelError::InvalidFontWeight {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for FontWeight {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FontWeight> for String {
    fn from(weight: FontWeight) -> Self {
        weight.value().to_string()
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// How a subtitle card is drawn.
///
/// Spatial fields are integer pixels. Missing fields in a persisted record
/// take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubtitleStyle {
    /// Font family name.
    pub font_family: String,

    pub font_weight: FontWeight,

    /// Font size in pixels. Also the text box height.
    pub font_size: u32,

    /// Extra advance between consecutive glyphs (may be negative).
    pub letter_spacing: i32,

    pub text_color: HexColor,

    pub bg_color: HexColor,

    /// Background opacity in percent `[0, 100]`.
    pub bg_opacity: u8,

    /// Padding above and below the text box.
    pub padding_v: u32,

    /// Padding left and right of the text.
    pub padding_h: u32,

    /// Background corner radius. Zero draws a plain rectangle.
    pub border_radius: u32,

    /// Vertical shift of the text baseline from the card center.
    pub text_offset_y: i32,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_family: "Pretendard".to_string(),
            font_weight: FontWeight::Bold,
            font_size: 48,
            letter_spacing: -1,
            text_color: HexColor::WHITE,
            bg_color: HexColor::BLACK,
            bg_opacity: 70,
            padding_v: 16,
            padding_h: 24,
            border_radius: 8,
            text_offset_y: 0,
        }
    }
}

/// Largest accepted font size in pixels.
pub const MAX_FONT_SIZE: u32 = 1000;

/// Style fields addressable by name (CLI `style set`, form bindings).
pub const STYLE_FIELDS: [&str; 11] = [
    "fontFamily",
    "fontWeight",
    "fontSize",
    "letterSpacing",
    "textColor",
    "bgColor",
    "bgOpacity",
    "paddingV",
    "paddingH",
    "borderRadius",
    "textOffsetY",
];

impl SubtitleStyle {
    /// Return a copy that satisfies the style invariants.
    ///
    /// A zero font size is replaced by the default size and larger sizes are
    /// capped at [`MAX_FONT_SIZE`]. Opacity is clamped to 100 and an empty
    /// family falls back to the default family.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.font_size == 0 {
            self.font_size = defaults.font_size;
        }
        self.font_size = self.font_size.min(MAX_FONT_SIZE);
        if self.font_family.trim().is_empty() {
            self.font_family = defaults.font_family;
        }
        self.bg_opacity = self.bg_opacity.min(100);
        self
    }

    /// Set one field from its textual form.
    ///
    /// Field names are the persisted camelCase keys; snake_case is accepted too.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), ModelError> {
        let value = value.trim();
        let invalid = |message: &str| ModelError::InvalidField {
            field: field.to_string(),
            message: message.to_string(),
        };
        let normalized: String = field
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "fontfamily" => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.font_family = value.to_string();
            }
            "fontweight" => self.font_weight = value.parse()?,
            "fontsize" => {
                let size: u32 = value
                    .parse()
                    .map_err(|_| invalid("expected a positive integer"))?;
                if size == 0 {
                    return Err(invalid("must be greater than zero"));
                }
                if size > MAX_FONT_SIZE {
                    return Err(invalid(&format!("must be at most {MAX_FONT_SIZE}")));
                }
                self.font_size = size;
            }
            "letterspacing" => {
                self.letter_spacing = value.parse().map_err(|_| invalid("expected an integer"))?
            }
            "textcolor" => self.text_color = value.parse()?,
            "bgcolor" => self.bg_color = value.parse()?,
            "bgopacity" => {
                let opacity: u8 = value.parse().map_err(|_| invalid("expected 0..=100"))?;
                if opacity > 100 {
                    return Err(invalid("expected 0..=100"));
                }
                self.bg_opacity = opacity;
            }
            "paddingv" => {
                self.padding_v = value
                    .parse()
                    .map_err(|_| invalid("expected a non-negative integer"))?
            }
            "paddingh" => {
                self.padding_h = value
                    .parse()
                    .map_err(|_| invalid("expected a non-negative integer"))?
            }
            "borderradius" => {
                self.border_radius =
                    value.parse().map_err(|_| invalid("expected a non-negative integer"))?
            }
            "textoffsety" => {
                self.text_offset_y = value.parse().map_err(|_| invalid("expected an integer"))?
            }
            _ => return Err(invalid("unknown style field")),
        }
        Ok(())
    }

    /// Font shorthand in CSS order, e.g. `700 48px Pretendard`.
    pub fn font_shorthand(&self) -> String {
        format!("{} {}px {}", self.font_weight, self.font_size, self.font_family)
    }
}
