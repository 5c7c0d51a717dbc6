//! Stateless trend-alert evaluation.
//!
//! Each predicate looks at one input (plus, for crossing detection, an
//! explicit previous value supplied by the caller) and emits zero or one
//! event. No state survives between calls; "previous run" memory belongs
//! to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::market::indicators::MacdPoint;
use crate::domain::market::types::SnapshotRow;

/// Error type for alert threshold validation
#[derive(Debug, Error, PartialEq)]
pub enum AlertConfigError {
    #[error("Invalid threshold: {field} = {value}. Must be positive")]
    InvalidThreshold { field: &'static str, value: f64 },

    #[error("RSI bands invalid: oversold {oversold} must be below overbought {overbought}, both in [0, 100]")]
    InvalidRsiBands { oversold: f64, overbought: f64 },
}

/// Alert thresholds
///
/// # Invariants
///
/// - `change_threshold_pct > 0`
/// - `0 <= rsi_oversold < rsi_overbought <= 100`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertConfig {
    pub change_threshold_pct: f64,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl AlertConfig {
    pub fn new(
        change_threshold_pct: f64,
        rsi_overbought: f64,
        rsi_oversold: f64,
    ) -> Result<Self, AlertConfigError> {
        if !(change_threshold_pct > 0.0) {
            return Err(AlertConfigError::InvalidThreshold {
                field: "change_threshold_pct",
                value: change_threshold_pct,
            });
        }
        if !(0.0..=100.0).contains(&rsi_oversold)
            || !(0.0..=100.0).contains(&rsi_overbought)
            || rsi_oversold >= rsi_overbought
        {
            return Err(AlertConfigError::InvalidRsiBands {
                oversold: rsi_oversold,
                overbought: rsi_overbought,
            });
        }
        Ok(Self {
            change_threshold_pct,
            rsi_overbought,
            rsi_oversold,
        })
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            change_threshold_pct: 10.0,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

/// What tripped an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AlertCondition {
    ChangeExceedsThreshold { threshold_pct: f64 },
    RsiOverbought { threshold: f64 },
    RsiOversold { threshold: f64 },
    MacdBullishCross,
    MacdBearishCross,
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertCondition::ChangeExceedsThreshold { threshold_pct } => {
                write!(f, "24h change exceeds {threshold_pct}%")
            }
            AlertCondition::RsiOverbought { threshold } => {
                write!(f, "RSI above {threshold} (overbought)")
            }
            AlertCondition::RsiOversold { threshold } => {
                write!(f, "RSI below {threshold} (oversold)")
            }
            AlertCondition::MacdBullishCross => write!(f, "MACD crossed above signal"),
            AlertCondition::MacdBearishCross => write!(f, "MACD crossed below signal"),
        }
    }
}

/// A triggered sudden-movement condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub id: Uuid,
    pub asset_id: String,
    pub condition: AlertCondition,
    pub magnitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    fn new(
        asset_id: &str,
        condition: AlertCondition,
        magnitude: f64,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id: asset_id.to_string(),
            condition,
            magnitude,
            timestamp: observed_at,
        }
    }
}

/// `|24h % change| > threshold`. A missing change field never alerts.
pub fn evaluate_change(
    row: &SnapshotRow,
    config: &AlertConfig,
    observed_at: DateTime<Utc>,
) -> Option<AlertEvent> {
    let change = row.change_pct_24h?;
    if change.abs() > config.change_threshold_pct {
        return Some(AlertEvent::new(
            &row.id,
            AlertCondition::ChangeExceedsThreshold {
                threshold_pct: config.change_threshold_pct,
            },
            change,
            observed_at,
        ));
    }
    None
}

/// RSI band check: above the overbought band or below the oversold band.
pub fn evaluate_rsi(
    asset_id: &str,
    rsi: f64,
    config: &AlertConfig,
    observed_at: DateTime<Utc>,
) -> Option<AlertEvent> {
    if rsi > config.rsi_overbought {
        return Some(AlertEvent::new(
            asset_id,
            AlertCondition::RsiOverbought {
                threshold: config.rsi_overbought,
            },
            rsi,
            observed_at,
        ));
    }
    if rsi < config.rsi_oversold {
        return Some(AlertEvent::new(
            asset_id,
            AlertCondition::RsiOversold {
                threshold: config.rsi_oversold,
            },
            rsi,
            observed_at,
        ));
    }
    None
}

/// MACD/signal crossing between two consecutive evaluations.
///
/// Both points come from the caller; the sign change of the histogram
/// decides the direction. Magnitude is the current histogram value.
pub fn evaluate_macd_cross(
    asset_id: &str,
    previous: &MacdPoint,
    current: &MacdPoint,
    observed_at: DateTime<Utc>,
) -> Option<AlertEvent> {
    let condition = if previous.histogram <= 0.0 && current.histogram > 0.0 {
        AlertCondition::MacdBullishCross
    } else if previous.histogram >= 0.0 && current.histogram < 0.0 {
        AlertCondition::MacdBearishCross
    } else {
        return None;
    };
    Some(AlertEvent::new(
        asset_id,
        condition,
        current.histogram,
        observed_at,
    ))
}
