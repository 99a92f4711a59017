//! CLI command implementations.

pub mod chart;
pub mod exchanges;
