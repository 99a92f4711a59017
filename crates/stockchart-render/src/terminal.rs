//! Terminal candlestick chart using ratatui.

use chrono::NaiveDateTime;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color as TuiColor, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io::{self, IsTerminal};
use std::str::FromStr;
use std::time::Duration;
use stockchart_core::{
    CandlePoint, ChartSurface, Color, ConfigError, LineSeries, LineSpec, RenderError,
};
use tracing::{debug, info, warn};

/// Fraction of the price range added above and below the data.
const PRICE_PADDING: f64 = 0.05;

/// Chart color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    fn background(&self) -> TuiColor {
        match self {
            Theme::Dark => TuiColor::Rgb(0x13, 0x17, 0x22),
            Theme::Light => TuiColor::Rgb(0xFF, 0xFF, 0xFF),
        }
    }

    fn foreground(&self) -> TuiColor {
        match self {
            Theme::Dark => TuiColor::Rgb(0xD1, 0xD4, 0xDC),
            Theme::Light => TuiColor::Rgb(0x19, 0x19, 0x19),
        }
    }

    fn up(&self) -> TuiColor {
        TuiColor::Rgb(0x26, 0xA6, 0x9A)
    }

    fn down(&self) -> TuiColor {
        TuiColor::Rgb(0xEF, 0x53, 0x50)
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ConfigError::InvalidValue {
                key: "chart.theme".to_string(),
                reason: format!("expected 'dark' or 'light', got '{}'", other),
            }),
        }
    }
}

/// Presentation settings for the terminal chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    /// Maximum width in cells
    pub width: u16,
    /// Maximum height in cells
    pub height: u16,
    pub theme: Theme,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Stock Price Chart".to_string(),
            width: 160,
            height: 48,
            theme: Theme::Dark,
        }
    }
}

/// Visible data range in canvas coordinates.
///
/// X is the candle index; Y is price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// Chart contents and the drawing logic, independent of any terminal.
#[derive(Debug, Clone, Default)]
pub struct ChartView {
    options: ChartOptions,
    candles: Vec<CandlePoint>,
    series: Vec<LineSeries>,
    lines: Vec<LineSpec>,
    bounds: Option<ViewBounds>,
}

impl ChartView {
    pub fn new(options: ChartOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn bounds(&self) -> Option<ViewBounds> {
        self.bounds
    }

    pub fn set_candles(&mut self, candles: &[CandlePoint]) {
        self.candles = candles.to_vec();
        self.bounds = None;
    }

    pub fn add_line_series(&mut self, series: &LineSeries) {
        self.series.push(series.clone());
    }

    pub fn add_horizontal_line(&mut self, line: &LineSpec) {
        self.lines.push(line.clone());
    }

    /// Fit bounds to candles, visible indicator values and price lines.
    pub fn fit(&mut self) -> Option<ViewBounds> {
        if self.candles.is_empty() {
            self.bounds = None;
            return None;
        }

        let lows = self.candles.iter().map(|c| c.low);
        let highs = self.candles.iter().map(|c| c.high);
        let overlays = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
        let levels = self.lines.iter().map(|l| l.value);

        let (min, max) = lows
            .chain(highs)
            .chain(overlays)
            .chain(levels)
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        let range = max - min;
        let pad = if range > 0.0 {
            range * PRICE_PADDING
        } else {
            (max.abs() * PRICE_PADDING).max(1.0)
        };

        let bounds = ViewBounds {
            x: [-1.0, self.candles.len() as f64],
            y: [min - pad, max + pad],
        };
        debug!("Fitted chart bounds: {:?}", bounds);
        self.bounds = Some(bounds);
        self.bounds
    }

    /// Draw the chart into a frame.
    pub fn render(&self, frame: &mut Frame) {
        let theme = self.options.theme;
        let area = frame.area();
        let area = Rect {
            width: area.width.min(self.options.width),
            height: area.height.min(self.options.height),
            ..area
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.options.title))
            .style(Style::default().bg(theme.background()).fg(theme.foreground()));

        let (Some(bounds), false) = (self.bounds, self.candles.is_empty()) else {
            let message = Paragraph::new("No data")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let rows = chunks[0].height.saturating_sub(2).max(1);
        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .background_color(theme.background())
            .x_bounds(bounds.x)
            .y_bounds(bounds.y)
            .paint(|ctx| {
                self.paint_candles(ctx);
                ctx.layer();
                self.paint_series(ctx);
                self.paint_lines(ctx, bounds, rows);
                ctx.layer();
                self.paint_price_labels(ctx, bounds);
            });
        frame.render_widget(canvas, chunks[0]);
        frame.render_widget(self.footer(), chunks[1]);
    }

    fn paint_candles(&self, ctx: &mut Context) {
        let theme = self.options.theme;
        for (i, candle) in self.candles.iter().enumerate() {
            let x = i as f64;
            let color = if candle.close >= candle.open {
                theme.up()
            } else {
                theme.down()
            };
            ctx.draw(&CanvasLine::new(x, candle.low, x, candle.high, color));

            let top = candle.open.max(candle.close);
            let bottom = candle.open.min(candle.close);
            for dx in [-0.3, -0.15, 0.15, 0.3] {
                ctx.draw(&CanvasLine::new(x + dx, bottom, x + dx, top, color));
            }
        }
    }

    fn paint_series(&self, ctx: &mut Context) {
        let index: HashMap<NaiveDateTime, usize> = self
            .candles
            .iter()
            .enumerate()
            .map(|(i, c)| (c.time, i))
            .collect();

        for series in &self.series {
            let color = tui_color(&series.color);
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .filter_map(|p| index.get(&p.time).map(|&i| (i as f64, p.value)))
                .collect();
            for pair in points.windows(2) {
                let (x1, y1) = pair[0];
                let (x2, y2) = pair[1];
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
            }
        }
    }

    fn paint_lines(&self, ctx: &mut Context, bounds: ViewBounds, rows: u16) {
        let dot = (bounds.y[1] - bounds.y[0]) / f64::from(dot_rows(rows));
        for line in &self.lines {
            let color = tui_color(&line.color);
            for k in 0..line_thickness(line.width, rows) {
                let y = line.value + dot * f64::from(k);
                ctx.draw(&CanvasLine::new(bounds.x[0], y, bounds.x[1], y, color));
            }
            ctx.print(
                bounds.x[1] - label_span(bounds, &line.label),
                line.value,
                Span::styled(
                    format!("{} {:.2}", line.label, line.value),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            );
        }
    }

    fn paint_price_labels(&self, ctx: &mut Context, bounds: ViewBounds) {
        let [lo, hi] = bounds.y;
        let style = Style::default().fg(self.options.theme.foreground());
        for step in 0..5 {
            let price = lo + (hi - lo) * f64::from(step) / 4.0;
            ctx.print(bounds.x[0], price, Span::styled(format!("{:.2}", price), style));
        }
    }

    fn footer(&self) -> Paragraph<'static> {
        let theme = self.options.theme;
        let mut spans = Vec::new();

        if let (Some(first), Some(last)) = (self.candles.first(), self.candles.last()) {
            spans.push(Span::raw(format!(
                "{} - {}  ",
                first.time.format("%Y-%m-%d %H:%M"),
                last.time.format("%Y-%m-%d %H:%M")
            )));
        }
        for series in &self.series {
            spans.push(Span::styled(
                format!("■ {}  ", series.name),
                Style::default().fg(tui_color(&series.color)),
            ));
        }
        spans.push(Span::styled(
            "q/Esc: close",
            Style::default().add_modifier(Modifier::DIM),
        ));

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.background()).fg(theme.foreground()))
    }
}

/// Braille cells hold four dot rows.
fn dot_rows(rows: u16) -> u32 {
    u32::from(rows.max(1)) * 4
}

/// Dot rows drawn for a line of `width`, never more than the canvas holds.
fn line_thickness(width: u32, rows: u16) -> u32 {
    width.clamp(1, dot_rows(rows))
}

/// Canvas-width share a label needs so it stays inside the right edge.
fn label_span(bounds: ViewBounds, label: &str) -> f64 {
    let width = bounds.x[1] - bounds.x[0];
    (width * 0.01 * (label.len() as f64 + 8.0)).min(width * 0.5)
}

fn tui_color(color: &Color) -> TuiColor {
    let (r, g, b) = color.rgb();
    TuiColor::Rgb(r, g, b)
}

/// Chart surface that draws in the terminal.
///
/// Logs go to stderr, so the chart owns stdout while it is shown.
#[derive(Debug)]
pub struct TerminalSurface {
    view: ChartView,
    poll: Duration,
}

impl TerminalSurface {
    /// Create a surface, failing when stdout is not an interactive terminal.
    pub fn new(options: ChartOptions) -> Result<Self, RenderError> {
        if !io::stdout().is_terminal() {
            return Err(RenderError::Unavailable(
                "stdout is not a terminal; use --output to export JSON instead".to_string(),
            ));
        }
        Ok(Self {
            view: ChartView::new(options),
            poll: Duration::from_millis(250),
        })
    }

    pub fn view(&self) -> &ChartView {
        &self.view
    }

    fn run_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<(), RenderError> {
        loop {
            terminal.draw(|f| self.view.render(f))?;

            if event::poll(self.poll)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press
                        && (key.code == KeyCode::Char('q') || key.code == KeyCode::Esc)
                    {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Runs its restore step when dropped, including when setup fails midway.
struct TerminalSession<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> TerminalSession<F> {
    fn open(
        setup: impl FnOnce() -> Result<(), RenderError>,
        restore: F,
    ) -> Result<Self, RenderError> {
        let session = Self {
            restore: Some(restore),
        };
        setup()?;
        Ok(session)
    }
}

impl<F: FnOnce()> Drop for TerminalSession<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!("Failed to disable raw mode: {}", e);
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        warn!("Failed to leave alternate screen: {}", e);
    }
}

impl ChartSurface for TerminalSurface {
    fn set_candles(&mut self, candles: &[CandlePoint]) -> Result<(), RenderError> {
        self.view.set_candles(candles);
        Ok(())
    }

    fn add_line_series(&mut self, series: &LineSeries) -> Result<(), RenderError> {
        self.view.add_line_series(series);
        Ok(())
    }

    fn add_horizontal_line(&mut self, line: &LineSpec) -> Result<(), RenderError> {
        self.view.add_horizontal_line(line);
        Ok(())
    }

    fn fit_content(&mut self) -> Result<(), RenderError> {
        self.view.fit();
        Ok(())
    }

    fn show(&mut self) -> Result<(), RenderError> {
        info!("Showing chart: {}", self.view.options().title);

        let session = TerminalSession::open(
            || {
                enable_raw_mode()?;
                execute!(io::stdout(), EnterAlternateScreen)?;
                Ok(())
            },
            restore_terminal,
        )?;
        let res = Terminal::new(CrosstermBackend::new(io::stdout()))
            .map_err(RenderError::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));
        drop(session);

        info!("Chart closed");
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use stockchart_core::LinePoint;

    fn time(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn candles() -> Vec<CandlePoint> {
        vec![
            CandlePoint { time: time(0), open: 10.0, high: 12.0, low: 9.0, close: 11.0, volume: 5 },
            CandlePoint { time: time(15), open: 11.0, high: 11.5, low: 8.0, close: 8.5, volume: 7 },
        ]
    }

    fn screen_text(view: &ChartView, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| view.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("solarized".parse::<Theme>().is_err());
    }

    #[test]
    fn test_fit_pads_price_range() {
        let mut view = ChartView::new(ChartOptions::default());
        view.set_candles(&candles());

        let bounds = view.fit().unwrap();
        // low 8, high 12, range 4, pad 0.2
        assert!((bounds.y[0] - 7.8).abs() < 1e-9);
        assert!((bounds.y[1] - 12.2).abs() < 1e-9);
        assert_eq!(bounds.x, [-1.0, 2.0]);
    }

    #[test]
    fn test_fit_includes_overlays() {
        let mut view = ChartView::new(ChartOptions::default());
        view.set_candles(&candles());
        view.add_horizontal_line(&LineSpec::new("Target", 14.0, Color::parse("red").unwrap(), 1));
        view.add_line_series(&LineSeries {
            name: "ema_2".to_string(),
            color: Color::parse("blue").unwrap(),
            width: 2,
            points: vec![LinePoint { time: time(15), value: 6.0 }],
        });

        let bounds = view.fit().unwrap();
        // min 6, max 14, range 8, pad 0.4
        assert!((bounds.y[0] - 5.6).abs() < 1e-9);
        assert!((bounds.y[1] - 14.4).abs() < 1e-9);
    }

    #[test]
    fn test_fit_flat_series() {
        let mut view = ChartView::new(ChartOptions::default());
        let flat = CandlePoint { time: time(0), open: 5.0, high: 5.0, low: 5.0, close: 5.0, volume: 0 };
        view.set_candles(&[flat]);

        let bounds = view.fit().unwrap();
        assert!(bounds.y[0] < 5.0 && bounds.y[1] > 5.0);
    }

    #[test]
    fn test_line_thickness_is_bounded_by_canvas() {
        assert_eq!(line_thickness(1, 20), 1);
        assert_eq!(line_thickness(3, 20), 3);
        assert_eq!(line_thickness(0, 20), 1);
        assert_eq!(line_thickness(20_000_000, 20), 80);
        assert_eq!(line_thickness(u32::MAX, 0), 4);
    }

    #[test]
    fn test_render_wide_line() {
        let mut view = ChartView::new(ChartOptions::default());
        view.set_candles(&candles());
        view.add_horizontal_line(&LineSpec::new(
            "S",
            10.0,
            Color::parse("red").unwrap(),
            20_000_000,
        ));
        view.fit();

        let text = screen_text(&view, 80, 20);
        assert!(text.contains("q/Esc: close"));
    }

    #[test]
    fn test_session_restores_when_setup_fails() {
        use std::cell::Cell;

        let restored = Cell::new(0);
        let result = TerminalSession::open(
            || Err(RenderError::Io(io::Error::other("alternate screen"))),
            || restored.set(restored.get() + 1),
        );

        assert!(result.is_err());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn test_session_restores_once_on_drop() {
        use std::cell::Cell;

        let restored = Cell::new(0);
        let session =
            TerminalSession::open(|| Ok(()), || restored.set(restored.get() + 1)).unwrap();
        assert_eq!(restored.get(), 0);

        drop(session);
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn test_empty_view_shows_no_data() {
        let mut view = ChartView::new(ChartOptions::default());
        assert!(view.fit().is_none());

        let text = screen_text(&view, 60, 10);
        assert!(text.contains("No data"));
    }

    #[test]
    fn test_render_title_and_footer() {
        let options = ChartOptions {
            title: "Stock Price Chart - XETR (2025-07-01)".to_string(),
            ..ChartOptions::default()
        };
        let mut view = ChartView::new(options);
        view.set_candles(&candles());
        view.fit();

        let text = screen_text(&view, 100, 20);
        assert!(text.contains("Stock Price Chart - XETR (2025-07-01)"));
        assert!(text.contains("q/Esc: close"));
        assert!(text.contains("2025-07-01 09:00"));
    }
}
