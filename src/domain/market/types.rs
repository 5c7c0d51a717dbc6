use serde::{Deserialize, Serialize};
use std::fmt;

/// A single observed price at a point in time.
///
/// Timestamps are unix seconds, UTC. Within a validated [`AssetSeries`]
/// they are strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// A validated, strictly time-ordered price series for one asset.
///
/// Construct via [`normalize`](crate::domain::market::series::normalize);
/// the constructor is not public so the ordering and non-emptiness
/// invariants always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSeries {
    id: String,
    points: Vec<PricePoint>,
}

impl AssetSeries {
    pub(crate) fn from_validated(id: String, points: Vec<PricePoint>) -> Self {
        debug_assert!(!points.is_empty());
        debug_assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self { id, points }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Prices in timestamp order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Simple returns between consecutive points: `p_t / p_{t-1} - 1`.
    ///
    /// One element shorter than the series; empty for a single point.
    pub fn returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|w| w[1].price / w[0].price - 1.0)
            .collect()
    }
}

/// One row of a market snapshot table, as delivered by the provider.
///
/// Fields the provider omitted are `None`, never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub id: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub change_pct_24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
}

impl SnapshotRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current_price: None,
            change_pct_24h: None,
            market_cap: None,
            volume_24h: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn with_change_pct_24h(mut self, pct: f64) -> Self {
        self.change_pct_24h = Some(pct);
        self
    }

    pub fn with_market_cap(mut self, cap: f64) -> Self {
        self.market_cap = Some(cap);
        self
    }

    pub fn with_volume_24h(mut self, volume: f64) -> Self {
        self.volume_24h = Some(volume);
        self
    }
}

impl fmt::Display for SnapshotRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current_price {
            Some(p) => write!(f, "{} @ {}", self.id, p),
            None => write!(f, "{} @ ?", self.id),
        }
    }
}

/// One entry of the provider's trending list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub score: f64,
}
