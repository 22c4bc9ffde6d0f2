use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreError;

/// The complete set of entries at one instant, in persistence order.
/// Serializes as a JSON array of two-element `[key, value]` arrays.
pub type Snapshot = Vec<(String, Value)>;

/// Trait abstraction for whole-snapshot persistence.
/// Implementations can be file-backed or in-memory (tests).
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load every entry. Must resolve "no data" cases (missing/corrupt
    /// backing state) to an empty snapshot instead of failing.
    async fn load(&self) -> Snapshot;

    /// Replace the persisted state with `snapshot` in full.
    async fn save(&self, snapshot: Snapshot) -> Result<(), StoreError>;
}
