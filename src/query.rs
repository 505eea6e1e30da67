//! Read-only queries and projections over the asset collection
//!
//! Filtering, search, aggregate stats, and derived-URL lookup. Nothing
//! here mutates a record; stats are recomputed on demand rather than
//! maintained incrementally, since staleness tolerance is high and a
//! cached counter under concurrent mutation is not worth defending.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::GalleryError;
use crate::storage::ids::AssetId;
use crate::storage::traits::AssetStore;
use crate::storage::types::{AssetCategory, AssetSource, StoredAsset};
use crate::transform::{PresentationSize, Transform};

/// Filters combined with AND semantics; omitted fields match everything
#[derive(Clone, Debug, Default)]
pub struct ListFilter {
    pub category: Option<AssetCategory>,
    /// Asset must carry every requested tag (case-insensitive)
    pub tags: Vec<String>,
    /// Case-insensitive match against name, description, category or tags
    pub search: Option<String>,
    /// Include soft-deleted records
    pub include_inactive: bool,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: AssetCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn include_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    fn matches(&self, stored: &StoredAsset) -> bool {
        let asset = &stored.asset;
        if !self.include_inactive && !asset.is_active {
            return false;
        }
        if let Some(category) = self.category {
            if asset.category != category {
                return false;
            }
        }
        if !self.tags.is_empty() {
            let have: Vec<String> = asset.tags.iter().map(|t| t.to_lowercase()).collect();
            if !self.tags.iter().all(|t| have.contains(&t.to_lowercase())) {
                return false;
            }
        }
        if let Some(query) = &self.search {
            let query = query.to_lowercase();
            let hit = asset.name.to_lowercase().contains(&query)
                || asset.description.to_lowercase().contains(&query)
                || asset.category.as_str().contains(&query)
                || asset.tags.iter().any(|t| t.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Aggregate counts over the active asset set
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
    pub total_bytes: u64,
}

/// Read-only projection layer over the asset store
pub struct AssetCatalog<A: AssetStore> {
    assets: Arc<A>,
}

impl<A: AssetStore> AssetCatalog<A> {
    pub fn new(assets: Arc<A>) -> Self {
        Self { assets }
    }

    /// Assets matching all provided filters, newest upload first
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<StoredAsset>, GalleryError> {
        let mut matched: Vec<StoredAsset> = self
            .assets
            .list()
            .await?
            .into_iter()
            .filter(|stored| filter.matches(stored))
            .collect();
        matched.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(matched)
    }

    /// Look up a single asset, active or not
    pub async fn find(&self, id: &AssetId) -> Result<StoredAsset, GalleryError> {
        self.assets
            .get(id)
            .await?
            .ok_or_else(|| GalleryError::NotFound { id: id.clone() })
    }

    /// URL for a derived rendition of the asset
    ///
    /// Provider-backed assets get the transform spliced into their
    /// locator; local-fallback assets return the stored locator unchanged
    /// regardless of the requested parameters — transformation is not
    /// possible there, and a caller asking for a thumbnail should still
    /// get an image.
    pub async fn derived_url(&self, id: &AssetId, transform: &Transform) -> Result<String, GalleryError> {
        let stored = self.find(id).await?;
        match stored.source() {
            AssetSource::Provider => Ok(transform.apply(stored.locator())),
            AssetSource::LocalFallback => Ok(stored.locator().to_string()),
        }
    }

    /// URL for a named presentation size
    pub async fn sized_url(&self, id: &AssetId, size: PresentationSize) -> Result<String, GalleryError> {
        self.derived_url(id, &size.transform()).await
    }

    /// Counts by category and source over the active set
    ///
    /// One O(n) pass, recomputed per call.
    pub async fn stats(&self) -> Result<AssetStats, GalleryError> {
        let mut stats = AssetStats::default();
        for stored in self.assets.list().await? {
            if !stored.is_active() {
                continue;
            }
            stats.total += 1;
            stats.total_bytes += stored.asset.size;
            *stats.by_category.entry(stored.category().as_str().to_string()).or_insert(0) += 1;
            *stats.by_source.entry(stored.source().as_str().to_string()).or_insert(0) += 1;
        }
        Ok(stats)
    }
}
