//! Indicator parameter value objects.
//!
//! Parameters are validated on construction so indicator code can assume
//! sane periods and never divides by zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for indicator parameter validation
#[derive(Debug, Error, PartialEq)]
pub enum IndicatorConfigError {
    #[error("Invalid period: {field} = {value}. Must be > 0")]
    InvalidPeriod { field: &'static str, value: usize },

    #[error("Fast span {fast} must be smaller than slow span {slow}")]
    FastNotBelowSlow { fast: usize, slow: usize },
}

/// RSI parameters
///
/// # Invariants
///
/// - `period > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsiParams {
    period: usize,
}

impl RsiParams {
    pub fn new(period: usize) -> Result<Self, IndicatorConfigError> {
        if period == 0 {
            return Err(IndicatorConfigError::InvalidPeriod {
                field: "rsi_period",
                value: period,
            });
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Points needed before the first RSI value is defined.
    pub fn warmup(&self) -> usize {
        self.period + 1
    }
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// MACD parameters
///
/// # Invariants
///
/// - all spans > 0
/// - `fast < slow`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl MacdParams {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorConfigError> {
        for (field, value) in [
            ("macd_fast", fast),
            ("macd_slow", slow),
            ("macd_signal", signal),
        ] {
            if value == 0 {
                return Err(IndicatorConfigError::InvalidPeriod { field, value });
            }
        }
        if fast >= slow {
            return Err(IndicatorConfigError::FastNotBelowSlow { fast, slow });
        }
        Ok(Self { fast, slow, signal })
    }

    pub fn fast(&self) -> usize {
        self.fast
    }

    pub fn slow(&self) -> usize {
        self.slow
    }

    pub fn signal(&self) -> usize {
        self.signal
    }

    /// Points needed before MACD, signal and histogram are all defined.
    pub fn warmup(&self) -> usize {
        self.slow + self.signal
    }
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_convention() {
        assert_eq!(RsiParams::default().period(), 14);
        let macd = MacdParams::default();
        assert_eq!((macd.fast(), macd.slow(), macd.signal()), (12, 26, 9));
        assert_eq!(macd.warmup(), 35);
    }

    #[test]
    fn zero_period_is_rejected() {
        assert_eq!(
            RsiParams::new(0).unwrap_err(),
            IndicatorConfigError::InvalidPeriod {
                field: "rsi_period",
                value: 0
            }
        );
    }

    #[test]
    fn fast_must_be_below_slow() {
        assert!(MacdParams::new(26, 12, 9).is_err());
        assert!(MacdParams::new(12, 12, 9).is_err());
        assert!(MacdParams::new(12, 26, 9).is_ok());
    }
}
