//! Analysis orchestration over the snapshot store.
//!
//! Wires the read-only store to the pure domain computations: fetch raw
//! history, normalize, derive. All math lives in `domain`; this layer adds
//! fetching, tracing and error context.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::alerts::{self, AlertConfig, AlertEvent};
use crate::domain::market::correlation::{self, CorrelationMatrix};
use crate::domain::market::indicator_config::{MacdParams, RsiParams};
use crate::domain::market::indicators::{self, MacdResult, RsiResult};
use crate::domain::market::overview::{self, GlobalMetrics};
use crate::domain::market::rankings::{self, Movers};
use crate::domain::market::series;
use crate::domain::market::types::{AssetSeries, SnapshotRow};
use crate::domain::repositories::SnapshotStore;
use crate::domain::trading::portfolio::{self, Holding, PortfolioSummary};

/// Indicator bundle for one asset over one time range.
#[derive(Debug, Clone)]
pub struct AssetIndicators {
    pub series: AssetSeries,
    pub rsi: RsiResult,
    pub macd: MacdResult,
}

/// Derives analytical views from the externally-owned snapshot store.
pub struct AnalysisService {
    store: Arc<dyn SnapshotStore>,
}

impl AnalysisService {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// RSI and MACD for one asset over `[from, to]`.
    ///
    /// The stored history is normalized first; an `InsufficientHistory`
    /// failure means the indicators are unavailable for this range, which
    /// the caller may surface rather than treat as fatal.
    pub async fn indicators_for(
        &self,
        id: &str,
        from: i64,
        to: i64,
        rsi_params: &RsiParams,
        macd_params: &MacdParams,
    ) -> Result<AssetIndicators> {
        let raw = self
            .store
            .fetch_series(id, from, to)
            .await
            .with_context(|| format!("Failed to fetch history for {id}"))?;
        debug!(asset = id, points = raw.len(), "fetched raw history");

        let min_points = rsi_params.warmup().max(macd_params.warmup());
        let series = series::normalize(id, &raw, min_points)
            .with_context(|| format!("History for {id} is not usable for indicators"))?;

        Ok(AssetIndicators {
            rsi: indicators::rsi(&series, rsi_params),
            macd: indicators::macd(&series, macd_params),
            series,
        })
    }

    /// Pairwise return correlation across `ids` over `[from, to]`.
    pub async fn correlation_for(
        &self,
        ids: &[String],
        from: i64,
        to: i64,
    ) -> Result<CorrelationMatrix> {
        let mut all_series = Vec::with_capacity(ids.len());
        for id in ids {
            let raw = self
                .store
                .fetch_series(id, from, to)
                .await
                .with_context(|| format!("Failed to fetch history for {id}"))?;
            let series = series::normalize(id, &raw, 2)
                .with_context(|| format!("History for {id} is too short to correlate"))?;
            all_series.push(series);
        }

        let matrix = correlation::correlation_matrix(&all_series)
            .context("Series do not overlap enough to correlate")?;
        info!(assets = ids.len(), "computed correlation matrix");
        Ok(matrix)
    }

    /// Top-k gainers and losers from the latest snapshot.
    pub async fn movers(&self, k: usize) -> Result<Movers> {
        let rows = self.latest_rows().await?;
        Ok(rankings::movers(&rows, k)?)
    }

    /// Top-n assets by market cap from the latest snapshot.
    pub async fn top_by_market_cap(&self, n: usize) -> Result<Vec<SnapshotRow>> {
        let rows = self.latest_rows().await?;
        Ok(rankings::top_by_market_cap(&rows, n)?)
    }

    /// Aggregate market metrics from the latest snapshot.
    pub async fn global_metrics(&self) -> Result<GlobalMetrics> {
        let rows = self.latest_rows().await?;
        Ok(overview::global_metrics(&rows))
    }

    /// Evaluate the 24h-change rule against every row of the latest
    /// snapshot. Rows without a change value are skipped.
    pub async fn scan_change_alerts(
        &self,
        config: &AlertConfig,
        observed_at: DateTime<Utc>,
    ) -> Result<Vec<AlertEvent>> {
        let rows = self.latest_rows().await?;
        let events: Vec<AlertEvent> = rows
            .iter()
            .filter_map(|row| alerts::evaluate_change(row, config, observed_at))
            .collect();
        if !events.is_empty() {
            info!(count = events.len(), "sudden-movement alerts triggered");
        }
        Ok(events)
    }

    /// Value holdings against the latest snapshot prices.
    pub async fn value_portfolio(&self, holdings: &[Holding]) -> Result<PortfolioSummary> {
        let rows = self.latest_rows().await?;
        let mut prices: HashMap<String, Decimal> = HashMap::with_capacity(rows.len());
        for row in &rows {
            match row.current_price.map(Decimal::from_f64_retain) {
                Some(Some(price)) => {
                    prices.insert(row.id.clone(), price);
                }
                Some(None) => {
                    warn!(asset = %row.id, "price not representable as decimal, skipping");
                }
                None => {}
            }
        }
        Ok(portfolio::value_portfolio(holdings, &prices)?)
    }

    async fn latest_rows(&self) -> Result<Vec<SnapshotRow>> {
        self.store
            .latest_snapshot()
            .await
            .context("Failed to read latest snapshot")
    }
}
