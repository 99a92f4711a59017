//! Chart indicators.
//!
//! - [`moving_average`]: the EMA recursion behind every overlay
//! - [`IndicatorParser`]: parses `ema_50|red,ema_200|#00FF00`
//! - [`IndicatorCalculator`]: computes series over loaded records

pub mod calculator;
pub mod moving_average;
pub mod parser;

pub use calculator::{align_to, IndicatorCalculator, IndicatorMetadata};
pub use moving_average::{compute_ema, Ema};
pub use parser::{IndicatorParser, MAX_PERIOD};
