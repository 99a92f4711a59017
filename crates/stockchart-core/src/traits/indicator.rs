//! Indicator trait definitions.

use crate::error::ConfigError;

/// Trait for technical indicators.
///
/// Indicators process price data and produce derived values
/// for chart overlays.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically close prices)
    ///
    /// # Returns
    /// One value per position from `period() - 1` onward, or an empty
    /// vector when there is not enough data
    fn calculate(&self, data: &[f64]) -> Vec<f64>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), ConfigError> {
        if data.len() < self.period() {
            return Err(ConfigError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIndicator {
        period: usize,
    }

    impl Indicator for TestIndicator {
        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            if data.len() < self.period {
                return vec![];
            }
            // Simple sum indicator for testing
            data.windows(self.period).map(|w| w.iter().sum()).collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_validation() {
        let indicator = TestIndicator { period: 5 };

        assert_eq!(
            indicator.validate_data(&[1.0, 2.0, 3.0]),
            Err(ConfigError::InsufficientData {
                required: 5,
                available: 3
            })
        );
        assert!(indicator.validate_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
    }
}
