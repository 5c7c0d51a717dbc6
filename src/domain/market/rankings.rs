//! Mover and ranking extraction over a snapshot table.
//!
//! Rows whose ranking field is absent are excluded, never treated as zero.
//! Ties break by id ascending so the output is deterministic under any
//! permutation of the input.

use serde::Serialize;
use std::cmp::Ordering;

use crate::domain::errors::RankingError;
use crate::domain::market::types::{SnapshotRow, TrendingEntry};

/// Top gainers and losers by 24h % change.
#[derive(Debug, Clone, Serialize)]
pub struct Movers {
    pub gainers: Vec<SnapshotRow>,
    pub losers: Vec<SnapshotRow>,
}

/// Top-k rows by 24h % change, descending.
pub fn top_gainers(rows: &[SnapshotRow], k: usize) -> Result<Vec<SnapshotRow>, RankingError> {
    rank_by(rows, k, "change_pct_24h", |r| r.change_pct_24h, true)
}

/// Bottom-k rows by 24h % change, ascending.
pub fn top_losers(rows: &[SnapshotRow], k: usize) -> Result<Vec<SnapshotRow>, RankingError> {
    rank_by(rows, k, "change_pct_24h", |r| r.change_pct_24h, false)
}

/// Gainers and losers in one pass, the shape the movers view consumes.
pub fn movers(rows: &[SnapshotRow], k: usize) -> Result<Movers, RankingError> {
    Ok(Movers {
        gainers: top_gainers(rows, k)?,
        losers: top_losers(rows, k)?,
    })
}

/// Top-n rows by market cap, descending.
pub fn top_by_market_cap(rows: &[SnapshotRow], n: usize) -> Result<Vec<SnapshotRow>, RankingError> {
    rank_by(rows, n, "market_cap", |r| r.market_cap, true)
}

/// Trending entries ordered by provider score descending, id ascending on
/// ties.
pub fn trending_by_score(entries: &[TrendingEntry]) -> Vec<TrendingEntry> {
    let mut out = entries.to_vec();
    out.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    out
}

fn rank_by(
    rows: &[SnapshotRow],
    k: usize,
    field: &'static str,
    value: impl Fn(&SnapshotRow) -> Option<f64>,
    descending: bool,
) -> Result<Vec<SnapshotRow>, RankingError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored: Vec<(f64, &SnapshotRow)> = rows
        .iter()
        .filter_map(|r| value(r).filter(|v| v.is_finite()).map(|v| (v, r)))
        .collect();

    if scored.is_empty() {
        return Err(RankingError::MissingField { field });
    }

    scored.sort_by(|(va, ra), (vb, rb)| {
        let primary = if descending {
            vb.partial_cmp(va)
        } else {
            va.partial_cmp(vb)
        };
        primary
            .unwrap_or(Ordering::Equal)
            .then_with(|| ra.id.cmp(&rb.id))
    });

    Ok(scored.into_iter().take(k).map(|(_, r)| r.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, change: Option<f64>, cap: Option<f64>) -> SnapshotRow {
        let mut r = SnapshotRow::new(id);
        r.change_pct_24h = change;
        r.market_cap = cap;
        r
    }

    #[test]
    fn gainers_and_losers_sort_by_change() {
        let rows = vec![
            row("ada", Some(-3.0), None),
            row("btc", Some(5.0), None),
            row("eth", Some(12.0), None),
            row("sol", Some(-8.0), None),
        ];
        let m = movers(&rows, 2).unwrap();
        let gainer_ids: Vec<&str> = m.gainers.iter().map(|r| r.id.as_str()).collect();
        let loser_ids: Vec<&str> = m.losers.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(gainer_ids, vec!["eth", "btc"]);
        assert_eq!(loser_ids, vec!["sol", "ada"]);
    }

    #[test]
    fn missing_change_is_excluded_not_zero() {
        // The None row would rank between the two if treated as 0.
        let rows = vec![
            row("btc", Some(5.0), None),
            row("mystery", None, None),
            row("sol", Some(-8.0), None),
        ];
        let m = movers(&rows, 3).unwrap();
        assert!(m.gainers.iter().all(|r| r.id != "mystery"));
        assert!(m.losers.iter().all(|r| r.id != "mystery"));
        assert_eq!(m.gainers.len(), 2);
    }

    #[test]
    fn null_only_field_is_an_error() {
        let rows = vec![row("btc", None, None), row("eth", None, None)];
        assert_eq!(
            top_gainers(&rows, 3).unwrap_err(),
            RankingError::MissingField {
                field: "change_pct_24h"
            }
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(top_gainers(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn ties_break_by_id_ascending() {
        let rows = vec![
            row("zrx", Some(4.0), None),
            row("aave", Some(4.0), None),
            row("btc", Some(4.0), None),
        ];
        let top = top_gainers(&rows, 3).unwrap();
        let ids: Vec<&str> = top.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["aave", "btc", "zrx"]);
    }

    #[test]
    fn ranking_is_stable_under_permutation() {
        let rows = vec![
            row("btc", Some(2.0), Some(1000.0)),
            row("eth", Some(7.0), Some(500.0)),
            row("sol", Some(7.0), Some(80.0)),
            row("ada", Some(-1.0), Some(20.0)),
        ];
        let mut permuted = rows.clone();
        permuted.rotate_left(2);
        permuted.swap(0, 1);

        assert_eq!(
            top_gainers(&rows, 4).unwrap(),
            top_gainers(&permuted, 4).unwrap()
        );
        assert_eq!(
            top_by_market_cap(&rows, 4).unwrap(),
            top_by_market_cap(&permuted, 4).unwrap()
        );
    }

    #[test]
    fn market_cap_ranking_descends_and_skips_missing() {
        let rows = vec![
            row("btc", None, Some(1000.0)),
            row("eth", None, Some(500.0)),
            row("unlisted", None, None),
        ];
        let top = top_by_market_cap(&rows, 10).unwrap();
        let ids: Vec<&str> = top.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["btc", "eth"]);
    }

    #[test]
    fn trending_orders_by_score_then_id() {
        let entries = vec![
            TrendingEntry {
                id: "b".into(),
                name: "B".into(),
                symbol: "b".into(),
                market_cap_rank: Some(2),
                score: 1.0,
            },
            TrendingEntry {
                id: "a".into(),
                name: "A".into(),
                symbol: "a".into(),
                market_cap_rank: Some(9),
                score: 1.0,
            },
            TrendingEntry {
                id: "c".into(),
                name: "C".into(),
                symbol: "c".into(),
                market_cap_rank: None,
                score: 5.0,
            },
        ];
        let ordered = trending_by_score(&entries);
        let ids: Vec<&str> = ordered.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
