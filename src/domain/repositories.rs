//! Snapshot Store Abstraction
//!
//! The historical snapshot store is owned by the data-fetching layer; the
//! analytical core only reads from it. This trait is the read interface:
//! an append-only, time-ordered record of provider snapshots.
//!
//! # Design
//!
//! The store hands back raw points exactly as recorded, including
//! duplicates from provider retries and gaps from provider outages.
//! Callers run them through `series::normalize` before any math.
//!
//! # Example
//!
//! ```rust,no_run
//! use coinscope::domain::repositories::SnapshotStore;
//! use coinscope::infrastructure::InMemorySnapshotStore;
//!
//! # async {
//! let store = InMemorySnapshotStore::new();
//! // let raw = store.fetch_series("bitcoin", 0, i64::MAX).await?;
//! // let rows = store.latest_snapshot().await?;
//! # };
//! ```

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::market::types::{PricePoint, SnapshotRow};

/// Read-only view of the externally-owned snapshot store
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Raw recorded points for one asset within `[from, to]` (unix
    /// seconds, inclusive), in recorded order.
    async fn fetch_series(&self, id: &str, from: i64, to: i64) -> Result<Vec<PricePoint>>;

    /// The most recent snapshot table, one row per asset.
    async fn latest_snapshot(&self) -> Result<Vec<SnapshotRow>>;
}
