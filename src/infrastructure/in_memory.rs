//! In-Memory Snapshot Store
//!
//! Thread-safe, in-memory implementation of `SnapshotStore`. The embedding
//! application's fetch layer appends to it; the analytical core reads
//! through the trait. Also the store used throughout the test suite.
//!
//! # Limitations
//!
//! - Data is lost on restart
//! - Limited by available RAM
//!
//! For durable history, implement `SnapshotStore` over a database.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::market::types::{PricePoint, SnapshotRow};
use crate::domain::repositories::SnapshotStore;

/// In-memory implementation of `SnapshotStore`
pub struct InMemorySnapshotStore {
    series: Arc<RwLock<HashMap<String, Vec<PricePoint>>>>,
    latest: Arc<RwLock<Vec<SnapshotRow>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            series: Arc::new(RwLock::new(HashMap::new())),
            latest: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append recorded points for one asset, in arrival order.
    pub async fn append_points(&self, id: &str, points: &[PricePoint]) {
        let mut series = self.series.write().await;
        series
            .entry(id.to_string())
            .or_default()
            .extend_from_slice(points);
    }

    /// Replace the current snapshot table with a fresh cycle.
    pub async fn replace_snapshot(&self, rows: Vec<SnapshotRow>) {
        *self.latest.write().await = rows;
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn fetch_series(&self, id: &str, from: i64, to: i64) -> Result<Vec<PricePoint>> {
        let series = self.series.read().await;
        Ok(series
            .get(id)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.timestamp >= from && p.timestamp <= to)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn latest_snapshot(&self) -> Result<Vec<SnapshotRow>> {
        Ok(self.latest.read().await.clone())
    }
}
