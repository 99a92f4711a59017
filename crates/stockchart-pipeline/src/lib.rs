//! End-to-end chart pipeline.
//!
//! Load the CSV, pick the latest day(s), filter each to its session, then
//! either export JSON or draw on a [`ChartSurface`]. The calendar and the
//! surface are traits so the whole flow runs against fakes in tests.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use stockchart_core::{
    CalendarError, ChartResult, ChartSurface, ConfigError, FilteredSeries, IndicatorSeries,
    LineSpec, OhlcvRecord, PlotSummary, TradingHoursProvider,
};
use stockchart_data::{filter_session, latest_date, latest_days, CsvReader};
use stockchart_export::{ExportContext, ExportEnvelope, JsonExporter};
use stockchart_indicators::{align_to, IndicatorCalculator, IndicatorParser};
use stockchart_lines::{ColorAllocator, LineSpecParser};
use stockchart_render::ChartPlotter;
use tracing::{debug, info, warn};

/// What the user asked for.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub input: PathBuf,
    pub exchange: String,
    pub days: usize,
    pub indicators: Option<String>,
    pub lines: Option<String>,
}

impl ChartRequest {
    pub fn new(input: impl Into<PathBuf>, exchange: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            exchange: exchange.into(),
            days: 1,
            indicators: None,
            lines: None,
        }
    }
}

/// A filtered series with its overlays, ready to export or plot.
#[derive(Debug, Clone)]
pub struct PreparedChart {
    pub exchange: String,
    pub days_requested: usize,
    pub input: PathBuf,
    pub series: FilteredSeries,
    /// Indicator series aligned to `series`
    pub indicators: Vec<IndicatorSeries>,
    pub lines: Vec<LineSpec>,
}

impl PreparedChart {
    pub fn export_context(&self) -> ExportContext {
        ExportContext {
            exchange_code: self.exchange.clone(),
            days_requested: self.days_requested,
            input_file: self.input.clone(),
            indicators: self.indicators.clone(),
            lines: self.lines.clone(),
        }
    }
}

/// Orchestrates loading, filtering and overlays for one invocation.
pub struct ChartPipeline<P: TradingHoursProvider> {
    calendar: P,
    reader: CsvReader,
    allocator: ColorAllocator,
}

impl<P: TradingHoursProvider> ChartPipeline<P> {
    pub fn new(calendar: P, reader: CsvReader) -> Self {
        Self {
            calendar,
            reader,
            allocator: ColorAllocator::new(),
        }
    }

    /// Use a specific allocator for lines without a color.
    pub fn with_allocator(mut self, allocator: ColorAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn calendar(&self) -> &P {
        &self.calendar
    }

    /// Run every stage up to the point of output.
    ///
    /// The exchange and the overlay specifications are checked before the
    /// file is read, so a bad argument never costs a load.
    pub fn prepare(&mut self, request: &ChartRequest) -> ChartResult<PreparedChart> {
        if request.days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "days".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        let exchange = request.exchange.trim().to_uppercase();
        self.calendar.history_start(&exchange)?;

        let specs = match &request.indicators {
            Some(text) => IndicatorParser::new().parse(text)?,
            None => Vec::new(),
        };
        let lines = match &request.lines {
            Some(text) => LineSpecParser::new().parse(text, &mut self.allocator)?,
            None => Vec::new(),
        };

        let records = self.reader.load(&request.input)?;
        if records.is_empty() {
            warn!("No data points found in {}", request.input.display());
        }

        let series = self.select_and_filter(&exchange, &records, request.days)?;
        if series.is_empty() {
            warn!("No data points within trading hours for {}", exchange);
        }

        let indicators = if specs.is_empty() {
            Vec::new()
        } else if records.is_empty() {
            warn!("Skipping indicators: no data loaded");
            Vec::new()
        } else {
            IndicatorCalculator::new()
                .calculate(&records, &specs)?
                .iter()
                .map(|full| align_to(full, &series.records))
                .collect()
        };

        Ok(PreparedChart {
            exchange,
            days_requested: request.days,
            input: request.input.clone(),
            series,
            indicators,
            lines,
        })
    }

    /// Pick the latest `days` dates present and filter each to its session.
    ///
    /// A date without a session keeps its records unfiltered and marks the
    /// series as not filtered to trading hours.
    pub fn select_and_filter(
        &self,
        exchange: &str,
        records: &[OhlcvRecord],
        days: usize,
    ) -> ChartResult<FilteredSeries> {
        let selected = latest_days(records, days);
        let dates: Vec<NaiveDate> = selected.keys().copied().collect();

        if let Some(latest) = latest_date(records) {
            self.check_calendar_coverage(exchange, latest, days, &dates)?;
        }

        let mut filtered_all = true;
        let mut kept = Vec::new();
        for (date, day_records) in selected {
            match self.calendar.trading_hours(exchange, date) {
                Ok(session) => {
                    debug!(
                        "Trading hours for {} on {}: {} to {}",
                        exchange, date, session.open, session.close
                    );
                    kept.extend(filter_session(day_records, &session));
                }
                Err(CalendarError::NoSession { .. }) => {
                    warn!(
                        "{} is not a trading day for {}, keeping {} unfiltered data points",
                        date,
                        exchange,
                        day_records.len()
                    );
                    filtered_all = false;
                    kept.extend(day_records);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let series = FilteredSeries::new(kept, dates, filtered_all);
        info!(
            "Final dataset: {} data points across {} day(s)",
            series.len(),
            series.days.len()
        );
        Ok(series)
    }

    /// Warn about sessions the calendar expects but the data lacks.
    ///
    /// Only sessions inside the span of the selected dates are reported.
    fn check_calendar_coverage(
        &self,
        exchange: &str,
        latest: NaiveDate,
        days: usize,
        dates: &[NaiveDate],
    ) -> ChartResult<()> {
        let sessions = self.calendar.latest_trading_days(exchange, latest, days)?;
        let earliest = dates.first().copied().unwrap_or(latest);
        let missing: Vec<String> = sessions
            .iter()
            .filter(|d| **d >= earliest && !dates.contains(d))
            .map(|d| d.to_string())
            .collect();

        if !missing.is_empty() {
            warn!(
                "Data has no records for {} session(s) of {}: {}",
                missing.len(),
                exchange,
                missing.join(", ")
            );
        }
        if dates.len() < days {
            warn!(
                "Requested {} day(s) but the data only covers {}",
                days,
                dates.len()
            );
        }
        Ok(())
    }

    /// Write the prepared chart as JSON.
    pub fn export(&self, chart: &PreparedChart, path: &Path) -> ChartResult<ExportEnvelope> {
        Ok(JsonExporter::new().export(&chart.series, &chart.export_context(), path)?)
    }

    /// Plot onto `surface` and show it.
    pub fn render(
        &self,
        chart: &PreparedChart,
        surface: &mut dyn ChartSurface,
    ) -> ChartResult<PlotSummary> {
        let summary =
            ChartPlotter::new().plot(surface, &chart.series, &chart.indicators, &chart.lines)?;
        surface.show()?;
        Ok(summary)
    }
}
