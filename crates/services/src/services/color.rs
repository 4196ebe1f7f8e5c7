//! CSS hex colors used for activities.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{3}([0-9a-fA-F]{3})?$").expect("hex color pattern"));

#[derive(Debug, Error, PartialEq)]
#[error("not a valid HEX color code: {0:?}")]
pub struct InvalidColor(pub String);

/// A color in `#rgb` or `#rrggbb` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(type = "string")]
pub struct Color(String);

impl Color {
    pub fn new(hex: &str) -> Result<Self, InvalidColor> {
        if HEX_COLOR.is_match(hex) {
            Ok(Self(hex.to_string()))
        } else {
            Err(InvalidColor(hex.to_string()))
        }
    }

    pub fn hex(&self) -> &str {
        &self.0
    }

    /// Six digit form of the color, without the leading `#`.
    fn expanded(&self) -> String {
        let code = &self.0[1..];
        if code.len() == 3 {
            code.chars().flat_map(|c| [c, c]).collect()
        } else {
            code.to_string()
        }
    }

    /// Lighter (positive `lum`) or darker (negative `lum`) variant, always in
    /// six digit lowercase form.
    pub fn luminance(&self, lum: f64) -> Color {
        let code = self.expanded();
        let mut hex = String::with_capacity(7);
        hex.push('#');

        for channel in 0..3 {
            let value = u8::from_str_radix(&code[channel * 2..channel * 2 + 2], 16).unwrap_or(0);
            let value = f64::from(value);
            let adjusted = (value + value * lum).clamp(0.0, 255.0).round() as u8;
            hex.push_str(&format!("{:02x}", adjusted));
        }

        Color(hex)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color("#fff".to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::new(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}
