//! Horizontal line overlays.
//!
//! [`LineSpecParser`] turns `label|value|color|width` groups into
//! [`stockchart_core::LineSpec`]s, drawing missing colors from a
//! [`ColorAllocator`] owned by the caller.

pub mod palette;
pub mod parser;

pub use palette::{ColorAllocator, PALETTE};
pub use parser::LineSpecParser;
