//! Aggregate market metrics over a full snapshot table.
//!
//! Mirrors the header metrics of the dashboard: total capitalization,
//! leader dominance, capitalization-weighted 24h change. Missing fields are
//! excluded from every aggregate, never counted as zero.

use serde::Serialize;

use crate::domain::market::types::SnapshotRow;

/// Aggregates derived from one snapshot cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalMetrics {
    /// Sum of all known market caps.
    pub total_market_cap: f64,
    /// Sum of all known 24h volumes.
    pub total_volume_24h: f64,
    /// Rows carrying a current price.
    pub priced_assets: usize,
    /// Largest market cap as a share of the total, in percent. `None` when
    /// no caps are known.
    pub top_dominance_pct: Option<f64>,
    /// 24h change weighted by market cap, over rows where both fields are
    /// present. `None` when no row qualifies.
    pub cap_weighted_change_pct_24h: Option<f64>,
}

pub fn global_metrics(rows: &[SnapshotRow]) -> GlobalMetrics {
    let total_market_cap: f64 = rows.iter().filter_map(|r| r.market_cap).sum();
    let total_volume_24h: f64 = rows.iter().filter_map(|r| r.volume_24h).sum();
    let priced_assets = rows.iter().filter(|r| r.current_price.is_some()).count();

    let top_dominance_pct = rows
        .iter()
        .filter_map(|r| r.market_cap)
        .fold(None::<f64>, |max, cap| {
            Some(max.map_or(cap, |m| m.max(cap)))
        })
        .filter(|_| total_market_cap > 0.0)
        .map(|top| top / total_market_cap * 100.0);

    let mut weighted = 0.0;
    let mut weight = 0.0;
    for row in rows {
        if let (Some(cap), Some(change)) = (row.market_cap, row.change_pct_24h) {
            weighted += cap * change;
            weight += cap;
        }
    }
    let cap_weighted_change_pct_24h = (weight > 0.0).then(|| weighted / weight);

    GlobalMetrics {
        total_market_cap,
        total_volume_24h,
        priced_assets,
        top_dominance_pct,
        cap_weighted_change_pct_24h,
    }
}
