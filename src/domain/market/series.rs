//! Series normalization: turn raw provider points into a validated
//! [`AssetSeries`].
//!
//! Raw snapshot history may arrive unsorted, with duplicate timestamps
//! (provider retries) and irregular gaps (provider outages). Normalization
//! sorts, deduplicates keeping the latest-received value per timestamp, and
//! validates prices. Gaps are passed through untouched: downstream
//! indicators treat the series as ordered samples, not a fixed-period grid.

use crate::domain::errors::SeriesError;
use crate::domain::market::types::{AssetSeries, PricePoint};

/// Normalize a raw point sequence into a validated series.
///
/// `min_points` is the minimum length the caller's downstream computation
/// needs (e.g. `period + 1` for RSI). Pass 1 when any non-empty series is
/// acceptable. The caller decides whether an `InsufficientHistory` failure
/// means "indicator unavailable" or a hard error.
///
/// Duplicate timestamps keep the value that arrived last in the input.
pub fn normalize(
    id: &str,
    raw: &[PricePoint],
    min_points: usize,
) -> Result<AssetSeries, SeriesError> {
    if raw.is_empty() {
        return Err(SeriesError::Empty { id: id.to_string() });
    }

    for point in raw {
        if !point.price.is_finite() || point.price <= 0.0 {
            return Err(SeriesError::NonPositivePrice {
                id: id.to_string(),
                timestamp: point.timestamp,
                price: point.price,
            });
        }
    }

    // Stable sort preserves arrival order among equal timestamps, so after
    // deduplication the latest-received value wins.
    let mut points: Vec<PricePoint> = raw.to_vec();
    points.sort_by_key(|p| p.timestamp);

    let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.timestamp == point.timestamp => *last = point,
            _ => deduped.push(point),
        }
    }

    if deduped.len() < min_points {
        return Err(SeriesError::InsufficientHistory {
            id: id.to_string(),
            required: min_points,
            actual: deduped.len(),
        });
    }

    Ok(AssetSeries::from_validated(id.to_string(), deduped))
}
