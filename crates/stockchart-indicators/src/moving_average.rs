//! Moving average indicators.

use stockchart_core::traits::Indicator;
use stockchart_core::ConfigError;

/// Exponential Moving Average (EMA).
///
/// Seeded with the SMA of the first `period` values, then smoothed with
/// `2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Result<Self, ConfigError> {
        if period == 0 {
            return Err(ConfigError::InvalidPeriod(0));
        }
        let multiplier = 2.0 / (period as f64 + 1.0);
        Ok(Self { period, multiplier })
    }

    /// Smoothing factor.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Smoothed values from index `period - 1` onward, paired with that index.
    ///
    /// Yields nothing when `prices` is shorter than the period.
    fn smooth<'a>(&self, prices: &'a [f64]) -> impl Iterator<Item = (usize, f64)> + 'a {
        let period = self.period;
        let alpha = self.multiplier;
        let seed = prices
            .get(..period)
            .map(|window| window.iter().sum::<f64>() / period as f64);

        seed.into_iter().flat_map(move |seed| {
            let tail = prices[period..].iter().scan(seed, move |ema, &price| {
                *ema += alpha * (price - *ema);
                Some(*ema)
            });
            std::iter::once(seed)
                .chain(tail)
                .enumerate()
                .map(move |(offset, value)| (offset + period - 1, value))
        })
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        self.smooth(data).map(|(_, value)| value).collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// EMA values keyed by input index.
///
/// The first pair is at index `period - 1`; warm-up positions are absent.
pub fn compute_ema(prices: &[f64], period: usize) -> Result<Vec<(usize, f64)>, ConfigError> {
    let ema = Ema::new(period)?;
    ema.validate_data(prices)?;
    Ok(ema.smooth(prices).collect())
}
