//! Core traits for the stock chart plotter.

mod calendar;
mod indicator;
mod surface;

pub use calendar::TradingHoursProvider;
pub use indicator::Indicator;
pub use surface::ChartSurface;
