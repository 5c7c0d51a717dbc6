//! Cross-asset return correlation.
//!
//! Series are aligned by timestamp intersection before anything else: a
//! point participates only if every series has a value at that timestamp,
//! so asymmetric histories shrink the aligned set instead of being padded.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::domain::errors::CorrelationError;
use crate::domain::market::types::AssetSeries;

/// Minimum aligned points for a return sequence to exist at all.
const MIN_ALIGNED_POINTS: usize = 2;

/// Pairwise Pearson correlation of aligned return sequences.
///
/// Symmetric; diagonal is exactly 1.0 by definition, not computed.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    ids: Vec<String>,
    cells: HashMap<(String, String), f64>,
}

impl CorrelationMatrix {
    /// Asset ids in input order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Coefficient for a pair of assets, `None` if either id is unknown.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.cells.get(&(a.to_string(), b.to_string())).copied()
    }
}

/// Compute the correlation matrix over N series.
///
/// Fails with `InsufficientOverlap` when fewer than two timestamps are
/// shared by all series. Degenerate pairs (a constant return sequence)
/// yield a coefficient of 0.0 rather than NaN.
pub fn correlation_matrix(series: &[AssetSeries]) -> Result<CorrelationMatrix, CorrelationError> {
    let shared = shared_timestamps(series);
    if shared.len() < MIN_ALIGNED_POINTS {
        return Err(CorrelationError::InsufficientOverlap {
            aligned: shared.len(),
            required: MIN_ALIGNED_POINTS,
        });
    }

    let mut returns: Vec<Vec<f64>> = Vec::with_capacity(series.len());
    for s in series {
        let by_ts: HashMap<i64, f64> = s.points().iter().map(|p| (p.timestamp, p.price)).collect();
        let aligned: Vec<f64> = shared.iter().map(|ts| by_ts[ts]).collect();
        returns.push(
            aligned
                .windows(2)
                .map(|w| w[1] / w[0] - 1.0)
                .collect(),
        );
    }

    let ids: Vec<String> = series.iter().map(|s| s.id().to_string()).collect();
    let mut cells = HashMap::new();
    for i in 0..ids.len() {
        cells.insert((ids[i].clone(), ids[i].clone()), 1.0);
        for j in (i + 1)..ids.len() {
            let coeff = pearson(&returns[i], &returns[j]);
            cells.insert((ids[i].clone(), ids[j].clone()), coeff);
            cells.insert((ids[j].clone(), ids[i].clone()), coeff);
        }
    }

    Ok(CorrelationMatrix { ids, cells })
}

fn shared_timestamps(series: &[AssetSeries]) -> Vec<i64> {
    let mut iter = series.iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let mut shared: BTreeSet<i64> = first.points().iter().map(|p| p.timestamp).collect();
    for s in iter {
        let other: BTreeSet<i64> = s.points().iter().map(|p| p.timestamp).collect();
        shared = shared.intersection(&other).copied().collect();
    }
    shared.into_iter().collect()
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }

    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let mut numer = 0.0;
    let mut denom_a = 0.0;
    let mut denom_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        numer += da * db;
        denom_a += da * da;
        denom_b += db * db;
    }

    if denom_a == 0.0 || denom_b == 0.0 {
        return 0.0;
    }

    numer / (denom_a.sqrt() * denom_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::series::normalize;
    use crate::domain::market::types::PricePoint;

    fn series(id: &str, prices: &[(i64, f64)]) -> AssetSeries {
        let points: Vec<PricePoint> = prices
            .iter()
            .map(|&(ts, p)| PricePoint::new(ts, p))
            .collect();
        normalize(id, &points, 1).unwrap()
    }

    #[test]
    fn identical_series_correlate_at_one() {
        let a = series("a", &[(1, 100.0), (2, 110.0), (3, 104.0), (4, 120.0)]);
        let b = series("b", &[(1, 100.0), (2, 110.0), (3, 104.0), (4, 120.0)]);
        let matrix = correlation_matrix(&[a, b]).unwrap();
        assert!((matrix.get("a", "b").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mirrored_returns_correlate_at_minus_one() {
        // Returns of b are the exact negatives of a's: +10%, -10%, +20% vs
        // -10%, +10%, -20%.
        let a = series("a", &[(1, 100.0), (2, 110.0), (3, 99.0), (4, 118.8)]);
        let b = series("b", &[(1, 100.0), (2, 90.0), (3, 99.0), (4, 79.2)]);
        let matrix = correlation_matrix(&[a, b]).unwrap();
        assert!((matrix.get("a", "b").unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let a = series("a", &[(1, 100.0), (2, 105.0), (3, 103.0), (4, 111.0)]);
        let b = series("b", &[(1, 50.0), (2, 51.0), (3, 54.0), (4, 52.0)]);
        let c = series("c", &[(1, 9.0), (2, 8.5), (3, 9.4), (4, 9.1)]);
        let matrix = correlation_matrix(&[a, b, c]).unwrap();

        for x in matrix.ids() {
            assert_eq!(matrix.get(x, x), Some(1.0));
            for y in matrix.ids() {
                let xy = matrix.get(x, y).unwrap();
                let yx = matrix.get(y, x).unwrap();
                assert_eq!(xy, yx);
                assert!((-1.0..=1.0).contains(&xy));
            }
        }
    }

    #[test]
    fn alignment_drops_timestamps_missing_from_any_series() {
        // b has no point at ts 3; the pair aligns on {1, 2, 4}.
        let a = series("a", &[(1, 100.0), (2, 110.0), (3, 120.0), (4, 121.0)]);
        let b = series("b", &[(1, 10.0), (2, 11.0), (4, 12.1)]);
        let matrix = correlation_matrix(&[a, b]).unwrap();
        // Over the aligned set both move up each step: strong positive.
        assert!(matrix.get("a", "b").unwrap() > 0.0);
    }

    #[test]
    fn disjoint_series_fail_with_insufficient_overlap() {
        let a = series("a", &[(1, 100.0), (2, 110.0)]);
        let b = series("b", &[(10, 10.0), (11, 11.0)]);
        let err = correlation_matrix(&[a, b]).unwrap_err();
        assert_eq!(
            err,
            CorrelationError::InsufficientOverlap {
                aligned: 0,
                required: 2,
            }
        );
    }

    #[test]
    fn constant_price_pair_yields_zero_not_nan() {
        let a = series("a", &[(1, 5.0), (2, 5.0), (3, 5.0)]);
        let b = series("b", &[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let matrix = correlation_matrix(&[a, b]).unwrap();
        assert_eq!(matrix.get("a", "b"), Some(0.0));
    }
}
