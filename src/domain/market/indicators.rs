//! Technical indicators over a normalized series.
//!
//! Pure computation: no I/O, no shared state. Recurrences (EMA, Wilder
//! smoothing) run as local accumulators folded over the input, so the same
//! series and parameters always produce the same output.
//!
//! Every output vector is aligned index-for-index with the input series;
//! warm-up positions are `None` rather than an early unstable value.

use serde::Serialize;
use statrs::statistics::{Data, Distribution};

use crate::domain::market::indicator_config::{MacdParams, RsiParams};
use crate::domain::market::types::AssetSeries;

/// RSI values for one asset, aligned with the series points.
///
/// `None` until `period + 1` points are available; defined values are in
/// [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiResult {
    pub id: String,
    pub values: Vec<Option<f64>>,
}

impl RsiResult {
    /// Most recent defined value, if any point has warmed up.
    pub fn latest(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

/// MACD line, signal line and histogram at one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD output for one asset, aligned with the series points.
///
/// `None` until `slow + signal` points are available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdResult {
    pub id: String,
    pub points: Vec<Option<MacdPoint>>,
}

impl MacdResult {
    pub fn latest(&self) -> Option<MacdPoint> {
        self.points.iter().rev().find_map(|p| *p)
    }
}

/// Relative Strength Index with Wilder's smoothing.
///
/// Deltas are split into gains and losses; their smoothed averages are
/// seeded with the simple mean of the first `period` deltas, then updated
/// with `avg = (avg * (period - 1) + current) / period`. When the average
/// loss is zero RSI is 100.
pub fn rsi(series: &AssetSeries, params: &RsiParams) -> RsiResult {
    let prices = series.prices();
    let period = params.period();
    let mut values: Vec<Option<f64>> = vec![None; prices.len()];

    if prices.len() < params.warmup() {
        return RsiResult {
            id: series.id().to_string(),
            values,
        };
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    let mut avg_gain = deltas[..period]
        .iter()
        .map(|&d| if d > 0.0 { d } else { 0.0 })
        .sum::<f64>()
        / period as f64;
    let mut avg_loss = deltas[..period]
        .iter()
        .map(|&d| if d < 0.0 { -d } else { 0.0 })
        .sum::<f64>()
        / period as f64;

    values[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for (i, &delta) in deltas.iter().enumerate().skip(period) {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        values[i + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    RsiResult {
        id: series.id().to_string(),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Moving Average Convergence Divergence.
///
/// MACD line = EMA(fast) - EMA(slow); signal = EMA of the MACD line with
/// the signal span; histogram = MACD - signal. All three are reported only
/// once `slow + signal` points are available.
pub fn macd(series: &AssetSeries, params: &MacdParams) -> MacdResult {
    let prices = series.prices();
    let mut points: Vec<Option<MacdPoint>> = vec![None; prices.len()];

    if prices.len() < params.warmup() {
        return MacdResult {
            id: series.id().to_string(),
            points,
        };
    }

    let ema_fast = ema(&prices, params.fast());
    let ema_slow = ema(&prices, params.slow());

    // Dense MACD line starting at price index slow - 1.
    let first_macd = params.slow() - 1;
    let macd_line: Vec<f64> = (first_macd..prices.len())
        .map(|i| {
            let fast = ema_fast[i].expect("fast EMA defined wherever slow EMA is");
            let slow = ema_slow[i].expect("slow EMA defined from slow - 1");
            fast - slow
        })
        .collect();

    let signal_line = ema(&macd_line, params.signal());

    for i in (params.warmup() - 1)..prices.len() {
        let dense = i - first_macd;
        let signal = signal_line[dense].expect("signal EMA defined past warm-up");
        let macd = macd_line[dense];
        points[i] = Some(MacdPoint {
            macd,
            signal,
            histogram: macd - signal,
        });
    }

    MacdResult {
        id: series.id().to_string(),
        points,
    }
}

/// EMA aligned with the input: `None` before `span` values are available,
/// seeded with the simple average of the first `span` values, then
/// `ema_t = v_t * k + ema_{t-1} * (1 - k)` with `k = 2 / (span + 1)`.
fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut out: Vec<Option<f64>> = vec![None; values.len()];
    if values.len() < span {
        return out;
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut current = values[..span].iter().sum::<f64>() / span as f64;
    out[span - 1] = Some(current);

    for (i, &value) in values.iter().enumerate().skip(span) {
        current = value * k + current * (1.0 - k);
        out[i] = Some(current);
    }

    out
}

/// Trailing simple mean over a fixed window, aligned with the input.
///
/// `None` until the window is filled.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out: Vec<Option<f64>> = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for i in (window - 1)..values.len() {
        let data = Data::new(values[i + 1 - window..=i].to_vec());
        out[i] = data.mean();
    }
    out
}

/// Trailing sample standard deviation over a fixed window, aligned with
/// the input. Typically applied to a return sequence as a volatility
/// estimate. `None` until the window is filled.
pub fn rolling_volatility(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out: Vec<Option<f64>> = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return out;
    }
    for i in (window - 1)..values.len() {
        let data = Data::new(values[i + 1 - window..=i].to_vec());
        out[i] = data.std_dev();
    }
    out
}
