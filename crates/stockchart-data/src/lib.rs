//! Data loading for the stock chart plotter.
//!
//! - [`TimestampFormat`] parses the `Local time` column, keeping offsets
//! - [`CsvReader`] loads OHLCV files and selects the latest day(s)
//! - [`filter`] restricts records to an exchange session window

mod csv_reader;
pub mod filter;
mod timestamp;

pub use csv_reader::{latest_date, latest_day, latest_days, CsvReader, REQUIRED_COLUMNS};
pub use filter::{filter_range, filter_session};
pub use timestamp::{
    date_range_string, format_date, iso_naive, strip_offset, TimestampFormat,
    DEFAULT_TIMESTAMP_FORMAT,
};

use std::path::Path;
use stockchart_core::{DataError, OhlcvRecord};

/// Load records from a CSV file using the default timestamp format.
pub fn load_csv(path: &Path) -> Result<Vec<OhlcvRecord>, DataError> {
    CsvReader::default().load(path)
}
