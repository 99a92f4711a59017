//! Chart colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Named colors accepted on the command line.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("red", "#FF0000"),
    ("green", "#00FF00"),
    ("blue", "#0000FF"),
    ("yellow", "#FFFF00"),
    ("orange", "#FFA500"),
    ("purple", "#800080"),
    ("cyan", "#00FFFF"),
    ("magenta", "#FF00FF"),
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("gray", "#808080"),
    ("grey", "#808080"),
];

/// A color normalized to upper-case `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse a named color or a hex code (with or without `#`).
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let lowered = text.trim().to_lowercase();

        if let Some((_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == lowered) {
            return Ok(Self((*hex).to_string()));
        }

        let digits = lowered.strip_prefix('#').unwrap_or(&lowered);
        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Self(format!("#{}", digits.to_uppercase())));
        }

        Err(ConfigError::InvalidColor(text.trim().to_string()))
    }

    /// Build a color from its components.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{:02X}{:02X}{:02X}", r, g, b))
    }

    /// The normalized `#RRGGBB` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }

    /// Names accepted by [`Color::parse`].
    pub fn named() -> impl Iterator<Item = &'static str> {
        NAMED_COLORS.iter().map(|(name, _)| *name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}
