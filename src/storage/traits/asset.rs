//! AssetStore trait for image asset metadata storage

use anyhow::Result;
use async_trait::async_trait;

use crate::storage::ids::AssetId;
use crate::storage::types::StoredAsset;

/// Trait for asset metadata storage operations
///
/// The store holds metadata only; the bytes live with whichever provider
/// produced the record's locator. Only the lifecycle manager mutates asset
/// records.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Insert a new asset record
    ///
    /// The id is assigned by the provider before insertion. Inserting an
    /// existing id overwrites the record (last write wins).
    async fn insert(&self, record: StoredAsset) -> Result<()>;

    /// Get an asset by id, active or not
    async fn get(&self, id: &AssetId) -> Result<Option<StoredAsset>>;

    /// Overwrite an existing record
    ///
    /// Returns false if the id is unknown.
    async fn update(&self, record: &StoredAsset) -> Result<bool>;

    /// All records, including inactive ones
    async fn list(&self) -> Result<Vec<StoredAsset>>;

    /// Hard-delete a record
    ///
    /// Returns true if the record existed. The lifecycle manager keeps
    /// soft-deleted records around; this exists for administrative purges.
    async fn remove(&self, id: &AssetId) -> Result<bool>;
}
