//! Horizontal price line overlays.

use serde::{Deserialize, Serialize};

use super::Color;

/// A labelled horizontal line, e.g. `Support|28.7|blue|2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    pub label: String,
    pub value: f64,
    pub color: Color,
    /// Line width, always at least 1
    pub width: u32,
}

impl LineSpec {
    pub fn new(label: impl Into<String>, value: f64, color: Color, width: u32) -> Self {
        Self {
            label: label.into(),
            value,
            color,
            width: width.max(1),
        }
    }
}
