//! ProjectStore trait for gallery project storage

use anyhow::Result;
use async_trait::async_trait;

use crate::storage::ids::ProjectId;
use crate::storage::types::{AssetRef, StoredProject};

/// Trait for gallery project storage operations
///
/// Project CRUD is owned by project-management code; this crate only needs
/// enough surface for the reference resolver to scan and repair refs. The
/// `update_refs` write is per-project and durable on return, which is what
/// makes batched repair safe to interrupt.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert a new project record
    async fn insert(&self, record: StoredProject) -> Result<()>;

    /// Get a project by id
    async fn get(&self, id: &ProjectId) -> Result<Option<StoredProject>>;

    /// A stable id-ordered page of projects
    ///
    /// Pagination must be stable under concurrent ref rewrites so a repair
    /// pass visits every record exactly once.
    async fn list_page(&self, offset: usize, limit: usize) -> Result<Vec<StoredProject>>;

    /// Total number of projects, active or not
    async fn count(&self) -> Result<usize>;

    /// Replace a project's asset refs, bumping its updated timestamp
    ///
    /// Returns false if the id is unknown. The write is durable when this
    /// returns.
    async fn update_refs(&self, id: &ProjectId, main_asset: AssetRef, assets: Vec<AssetRef>) -> Result<bool>;
}
