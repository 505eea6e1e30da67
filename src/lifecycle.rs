//! Asset lifecycle orchestration
//!
//! The only component allowed to mutate asset records. Every multi-step
//! operation runs its steps in one fixed order — provider write, store
//! write, reference repair, provider delete-of-old — so the irreversible
//! step is always last and always gated on a freshly re-confirmed
//! invariant. There is no locking: the store and provider are shared by
//! concurrent callers, and safety comes from idempotent, order-tolerant
//! steps.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GalleryConfig;
use crate::error::GalleryError;
use crate::provider::{RemoteAssetProvider, RemoteUpload, UploadRequest};
use crate::resolver::{MatchMode, ReferenceResolver};
use crate::storage::ids::{AssetId, ProjectId};
use crate::storage::traits::{AssetStore, GalleryTypes, Stores};
use crate::storage::types::{AssetCategory, AssetPatch, AssetRef, ImageAsset, StoredAsset};

/// Metadata supplied alongside the bytes of a new upload
#[derive(Clone, Debug)]
pub struct NewAsset {
    pub name: String,
    pub category: AssetCategory,
    pub tags: Vec<String>,
    pub description: String,
}

impl NewAsset {
    pub fn new(name: impl Into<String>, category: AssetCategory) -> Self {
        Self {
            name: name.into(),
            category,
            tags: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Orchestrates create/update/replace/delete over the metadata store and
/// the remote asset provider
pub struct AssetLifecycle<G: GalleryTypes> {
    assets: Arc<G::Assets>,
    provider: Arc<G::Provider>,
    resolver: ReferenceResolver<G::Projects>,
    folder_prefix: String,
    timeout: Duration,
    max_upload_bytes: u64,
}

impl<G: GalleryTypes> AssetLifecycle<G> {
    /// Create a lifecycle manager from individual instances
    pub fn new(
        assets: Arc<G::Assets>,
        projects: Arc<G::Projects>,
        provider: Arc<G::Provider>,
        config: &GalleryConfig,
    ) -> Self {
        Self {
            assets,
            provider,
            resolver: ReferenceResolver::new(projects).with_batch_size(config.repair_batch_size),
            folder_prefix: config.folder_prefix.clone(),
            timeout: config.provider.timeout(),
            max_upload_bytes: config.provider.max_upload_bytes,
        }
    }

    /// Create a lifecycle manager from a Stores implementation
    pub fn from_stores(stores: &impl Stores<G>, config: &GalleryConfig) -> Self {
        Self::new(stores.assets(), stores.projects(), stores.provider(), config)
    }

    /// The resolver backing this lifecycle, for referrer queries and for
    /// re-running a repair after a partial replace
    pub fn resolver(&self) -> &ReferenceResolver<G::Projects> {
        &self.resolver
    }

    /// Upload bytes and persist a new asset record
    ///
    /// The record is written only after the provider acknowledges the
    /// upload; a provider failure leaves the store untouched.
    pub async fn create(&self, bytes: Vec<u8>, new_asset: NewAsset) -> Result<StoredAsset, GalleryError> {
        self.validate_payload(&bytes)?;

        let folder = UploadRequest::folder_for(&self.folder_prefix, new_asset.category);
        let request = UploadRequest::new(bytes, folder).with_tags(new_asset.tags.clone());
        let upload = self.upload_with_deadline(request).await?;

        let stored = self.record_from_upload(upload, &new_asset);
        self.assets.insert(stored.clone()).await?;

        tracing::info!(id = %stored.id, category = %new_asset.category, "asset created");
        Ok(stored)
    }

    /// Apply a metadata-only patch
    ///
    /// Never touches the provider; the bytes and locator are immutable
    /// outside of replace.
    pub async fn update(&self, id: &AssetId, patch: &AssetPatch) -> Result<StoredAsset, GalleryError> {
        let mut stored = self.require(id).await?;
        patch.apply_to(&mut stored.asset);
        if !self.assets.update(&stored).await? {
            return Err(GalleryError::NotFound { id: id.clone() });
        }
        Ok(stored)
    }

    /// Replace an asset's bytes, repointing every reference to the new
    /// asset before the old one is retired
    ///
    /// On success the old record is inactive and its remote copy deleted.
    /// If the new upload fails nothing changes. If reference repair is
    /// incomplete the old asset is kept exactly as it was and the error
    /// names the projects still pointing at it — stale-but-resolvable
    /// beats broken.
    pub async fn replace(&self, id: &AssetId, bytes: Vec<u8>) -> Result<StoredAsset, GalleryError> {
        let old = self.require(id).await?;
        self.validate_payload(&bytes)?;

        let folder = UploadRequest::folder_for(&self.folder_prefix, old.category());
        let request = UploadRequest::new(bytes, folder).with_tags(old.asset.tags.clone());
        let upload = self.upload_with_deadline(request).await?;

        let new_asset = NewAsset::new(old.asset.name.clone(), old.category())
            .with_tags(old.asset.tags.clone())
            .with_description(old.asset.description.clone());
        let new_stored = self.record_from_upload(upload, &new_asset);

        // Content-addressed providers can hand back the old id for
        // identical bytes; the insert below then just refreshes the
        // record and there is nothing to repair or retire.
        let same_asset = new_stored.id == old.id;
        self.assets.insert(new_stored.clone()).await?;
        if same_asset {
            return Ok(new_stored);
        }

        let old_id_ref = AssetRef::id(old.id.clone());
        let new_id_ref = AssetRef::id(new_stored.id.clone());
        let mut failed: Vec<ProjectId> = Vec::new();

        let report = self
            .resolver
            .repair_references(&old_id_ref, &new_id_ref, MatchMode::Exact)
            .await?;
        failed.extend(report.failed_ids);

        // Legacy records reference the old locator rather than the id.
        let report = self
            .resolver
            .repair_references(
                &AssetRef::locator(old.locator()),
                &AssetRef::locator(new_stored.locator()),
                MatchMode::Exact,
            )
            .await?;
        for project in report.failed_ids {
            if !failed.contains(&project) {
                failed.push(project);
            }
        }

        if !failed.is_empty() {
            tracing::warn!(
                old = %old.id,
                new = %new_stored.id,
                failed = failed.len(),
                "replace kept old asset after incomplete reference repair"
            );
            return Err(GalleryError::PartialReplace { new_id: new_stored.id.clone(), failed_ids: failed });
        }

        // Re-confirm before retiring: a concurrent writer may have added a
        // reference to the old asset since the repair pass.
        let remaining = self.referrers_of(&old).await?;
        if !remaining.is_empty() {
            tracing::warn!(
                old = %old.id,
                referrers = remaining.len(),
                "replace kept old asset: new references appeared during repair"
            );
            return Err(GalleryError::PartialReplace { new_id: new_stored.id.clone(), failed_ids: remaining });
        }

        let mut retired = old.clone();
        retired.asset.is_active = false;
        self.assets.update(&retired).await?;

        // The remote copy is now unreferenced; losing this delete only
        // orphans bytes, never references.
        if let Err(e) = self.provider.delete(&old.id).await {
            tracing::warn!(id = %old.id, error = %e, "old remote asset left orphaned");
        }

        tracing::info!(old = %old.id, new = %new_stored.id, "asset replaced");
        Ok(new_stored)
    }

    /// Retire an asset that nothing references
    ///
    /// Soft-deletes the record, then hard-deletes the remote copy. The
    /// referrer check is re-run immediately before the irreversible
    /// provider delete, tolerating concurrent repairs and project edits.
    pub async fn delete(&self, id: &AssetId) -> Result<(), GalleryError> {
        let stored = self.require(id).await?;

        let referrers = self.referrers_of(&stored).await?;
        if !referrers.is_empty() {
            return Err(GalleryError::ReferencedAsset { id: id.clone(), count: referrers.len() });
        }

        let mut retired = stored.clone();
        retired.asset.is_active = false;
        if !self.assets.update(&retired).await? {
            return Err(GalleryError::NotFound { id: id.clone() });
        }

        // A concurrent replace may have repointed a project at this asset
        // between the first check and the soft delete.
        let referrers = self.referrers_of(&stored).await?;
        if !referrers.is_empty() {
            self.assets.update(&stored).await?;
            tracing::warn!(id = %id, referrers = referrers.len(), "delete aborted: asset re-referenced concurrently");
            return Err(GalleryError::ReferencedAsset { id: id.clone(), count: referrers.len() });
        }

        match self.provider.delete(id).await {
            Ok(()) => {
                tracing::info!(id = %id, "asset deleted");
                Ok(())
            }
            Err(crate::provider::ProviderError::Timeout(limit)) => {
                // Record stays soft-deleted; the remote delete can be
                // retried without re-checking anything.
                Err(GalleryError::ProviderTimeout { limit })
            }
            Err(e) => Err(GalleryError::Provider(e)),
        }
    }

    async fn require(&self, id: &AssetId) -> Result<StoredAsset, GalleryError> {
        self.assets
            .get(id)
            .await?
            .ok_or_else(|| GalleryError::NotFound { id: id.clone() })
    }

    fn validate_payload(&self, bytes: &[u8]) -> Result<(), GalleryError> {
        if bytes.is_empty() {
            return Err(GalleryError::Upload { reason: "empty payload".to_string() });
        }
        if bytes.len() as u64 > self.max_upload_bytes {
            return Err(GalleryError::Upload {
                reason: format!("payload of {} bytes exceeds cap of {}", bytes.len(), self.max_upload_bytes),
            });
        }
        Ok(())
    }

    async fn upload_with_deadline(&self, request: UploadRequest) -> Result<RemoteUpload, GalleryError> {
        match tokio::time::timeout(self.timeout, self.provider.upload(request)).await {
            Ok(Ok(upload)) => Ok(upload),
            Ok(Err(e)) => Err(GalleryError::from_upload_failure(e)),
            Err(_) => Err(GalleryError::ProviderTimeout { limit: self.timeout }),
        }
    }

    fn record_from_upload(&self, upload: RemoteUpload, new_asset: &NewAsset) -> StoredAsset {
        let asset = ImageAsset::new(new_asset.name.clone(), upload.url, new_asset.category)
            .with_tags(new_asset.tags.clone())
            .with_description(new_asset.description.clone())
            .with_dimensions(upload.width, upload.height, upload.bytes)
            .with_format(upload.format)
            .with_source(self.provider.source());
        StoredAsset::new(upload.id, asset, Utc::now())
    }

    /// Active projects referencing the asset by id or by its exact locator
    async fn referrers_of(&self, stored: &StoredAsset) -> Result<Vec<ProjectId>, GalleryError> {
        let mut referrers = self.resolver.resolve_referrers(&AssetRef::id(stored.id.clone())).await?;
        for project in self.resolver.resolve_referrers(&AssetRef::locator(stored.locator())).await? {
            if !referrers.contains(&project) {
                referrers.push(project);
            }
        }
        Ok(referrers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use crate::provider::{MockProvider, ProviderCall, ScriptedFailure};
    use crate::storage::implementations::memory::{MemoryAssetStore, MemoryProjectStore};
    use crate::storage::traits::ProjectStore;
    use crate::storage::types::{AssetSource, GalleryProject, StoredProject};

    struct TestGallery;

    impl GalleryTypes for TestGallery {
        type Assets = MemoryAssetStore;
        type Projects = MemoryProjectStore;
        type Provider = MockProvider;
    }

    struct Harness {
        assets: Arc<MemoryAssetStore>,
        projects: Arc<MemoryProjectStore>,
        provider: Arc<MockProvider>,
        lifecycle: AssetLifecycle<TestGallery>,
    }

    fn harness() -> Harness {
        let assets = Arc::new(MemoryAssetStore::new());
        let projects = Arc::new(MemoryProjectStore::new());
        let provider = Arc::new(MockProvider::new());
        let lifecycle = AssetLifecycle::new(
            assets.clone(),
            projects.clone(),
            provider.clone(),
            &GalleryConfig::default(),
        );
        Harness { assets, projects, provider, lifecycle }
    }

    async fn seed_project(projects: &MemoryProjectStore, id: &str, main: AssetRef, assets: Vec<AssetRef>) {
        let record = StoredProject::new(
            ProjectId::from_string(id),
            GalleryProject::new(id, AssetCategory::Kitchen, main).with_assets(assets),
            Utc::now(),
        );
        projects.insert(record).await.unwrap();
    }

    #[tokio::test]
    async fn create_uploads_then_persists() {
        let h = harness();
        let new_asset = NewAsset::new("granite-island", AssetCategory::Kitchen)
            .with_tags(vec!["granite".into()])
            .with_description("island remodel");

        let stored = h.lifecycle.create(vec![1, 2, 3], new_asset).await.unwrap();
        assert!(stored.is_active());
        assert_eq!(stored.source(), AssetSource::Provider);
        assert_eq!(
            h.provider.calls(),
            vec![ProviderCall::Upload { folder: "gallery/kitchen".to_string() }]
        );
        assert!(h.assets.get(&stored.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_rejects_empty_and_oversized_payloads_before_upload() {
        let h = harness();
        let err = h.lifecycle.create(vec![], NewAsset::new("x", AssetCategory::Blog)).await.unwrap_err();
        assert!(matches!(err, GalleryError::Upload { .. }));

        let mut config = GalleryConfig::default();
        config.provider.max_upload_bytes = 2;
        let small = AssetLifecycle::<TestGallery>::new(
            h.assets.clone(),
            h.projects.clone(),
            h.provider.clone(),
            &config,
        );
        let err = small.create(vec![1, 2, 3], NewAsset::new("x", AssetCategory::Blog)).await.unwrap_err();
        assert!(matches!(err, GalleryError::Upload { .. }));

        assert!(h.provider.calls().is_empty());
        assert!(h.assets.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_timeout_writes_nothing() {
        let h = harness();
        h.provider.fail_with(ScriptedFailure::TimeoutUploads);

        let err = h.lifecycle.create(vec![1], NewAsset::new("x", AssetCategory::Team)).await.unwrap_err();
        assert!(matches!(err, GalleryError::ProviderTimeout { .. }));
        assert!(h.assets.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_enforces_its_own_deadline_on_a_hung_provider() {
        let assets = Arc::new(MemoryAssetStore::new());
        let projects = Arc::new(MemoryProjectStore::new());
        let provider = Arc::new(MockProvider::new());
        provider.fail_with(ScriptedFailure::HangUploads);

        let mut config = GalleryConfig::default();
        config.provider.timeout_secs = 0;
        let lifecycle = AssetLifecycle::<TestGallery>::new(assets.clone(), projects, provider, &config);

        let err = lifecycle.create(vec![1], NewAsset::new("x", AssetCategory::General)).await.unwrap_err();
        assert!(matches!(err, GalleryError::ProviderTimeout { .. }));
        assert!(assets.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_patches_metadata_only() {
        let h = harness();
        let stored = h.lifecycle.create(vec![1], NewAsset::new("before", AssetCategory::Kitchen)).await.unwrap();

        let patch = AssetPatch { description: Some("after".into()), ..Default::default() };
        let updated = h.lifecycle.update(&stored.id, &patch).await.unwrap();
        assert_eq!(updated.asset.description, "after");
        assert_eq!(updated.locator(), stored.locator());
        // No further provider calls beyond the original upload.
        assert_eq!(h.provider.calls().len(), 1);

        let err = h.lifecycle.update(&AssetId::from_string("ghost"), &patch).await.unwrap_err();
        assert!(matches!(err, GalleryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn replace_repoints_references_and_retires_old_asset() {
        let h = harness();
        let old = h.lifecycle.create(vec![1], NewAsset::new("kitchen", AssetCategory::Kitchen)).await.unwrap();
        seed_project(
            &h.projects,
            "p1",
            AssetRef::id(old.id.clone()),
            vec![AssetRef::id(old.id.clone()), AssetRef::id(AssetId::from_string("unrelated"))],
        )
        .await;

        let new = h.lifecycle.replace(&old.id, vec![9, 9, 9]).await.unwrap();
        assert_ne!(new.id, old.id);
        assert!(new.is_active());

        let project = h.projects.get(&ProjectId::from_string("p1")).await.unwrap().unwrap();
        assert_eq!(project.project.main_asset, AssetRef::id(new.id.clone()));
        assert_eq!(project.project.assets[0], AssetRef::id(new.id.clone()));
        assert_eq!(project.project.assets[1], AssetRef::id(AssetId::from_string("unrelated")));
        assert!(!project.project.refers_to(&AssetRef::id(old.id.clone())));

        let old_record = h.assets.get(&old.id).await.unwrap().unwrap();
        assert!(!old_record.is_active());
        assert_eq!(h.provider.deleted_ids(), vec![old.id.clone()]);
    }

    #[tokio::test]
    async fn replace_heals_legacy_locator_references() {
        let h = harness();
        let old = h.lifecycle.create(vec![1], NewAsset::new("bath", AssetCategory::Bathroom)).await.unwrap();
        seed_project(&h.projects, "legacy", AssetRef::locator(old.locator()), vec![]).await;

        let new = h.lifecycle.replace(&old.id, vec![2]).await.unwrap();

        let project = h.projects.get(&ProjectId::from_string("legacy")).await.unwrap().unwrap();
        assert_eq!(project.project.main_asset, AssetRef::locator(new.locator()));
    }

    #[tokio::test]
    async fn replace_upload_failure_leaves_everything_untouched() {
        let h = harness();
        let old = h.lifecycle.create(vec![1], NewAsset::new("kitchen", AssetCategory::Kitchen)).await.unwrap();
        seed_project(&h.projects, "p1", AssetRef::id(old.id.clone()), vec![]).await;

        h.provider.fail_with(ScriptedFailure::UnreachableUploads);
        let err = h.lifecycle.replace(&old.id, vec![2]).await.unwrap_err();
        assert!(matches!(err, GalleryError::Upload { .. }));

        let old_record = h.assets.get(&old.id).await.unwrap().unwrap();
        assert!(old_record.is_active());
        let project = h.projects.get(&ProjectId::from_string("p1")).await.unwrap().unwrap();
        assert_eq!(project.project.main_asset, AssetRef::id(old.id.clone()));
        assert!(h.provider.deleted_ids().is_empty());
    }

    /// Project store that fails persistence for selected ids
    struct FailingProjectStore {
        inner: MemoryProjectStore,
        failing: Mutex<HashSet<String>>,
    }

    impl FailingProjectStore {
        fn new(failing: impl IntoIterator<Item = &'static str>) -> Self {
            Self {
                inner: MemoryProjectStore::new(),
                failing: Mutex::new(failing.into_iter().map(String::from).collect()),
            }
        }

        fn heal(&self) {
            self.failing.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl ProjectStore for FailingProjectStore {
        async fn insert(&self, record: StoredProject) -> anyhow::Result<()> {
            self.inner.insert(record).await
        }

        async fn get(&self, id: &ProjectId) -> anyhow::Result<Option<StoredProject>> {
            self.inner.get(id).await
        }

        async fn list_page(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<StoredProject>> {
            self.inner.list_page(offset, limit).await
        }

        async fn count(&self) -> anyhow::Result<usize> {
            self.inner.count().await
        }

        async fn update_refs(
            &self,
            id: &ProjectId,
            main_asset: AssetRef,
            assets: Vec<AssetRef>,
        ) -> anyhow::Result<bool> {
            if self.failing.lock().unwrap().contains(id.as_str()) {
                return Err(anyhow!("write refused"));
            }
            self.inner.update_refs(id, main_asset, assets).await
        }
    }

    struct FlakyGallery;

    impl GalleryTypes for FlakyGallery {
        type Assets = MemoryAssetStore;
        type Projects = FailingProjectStore;
        type Provider = MockProvider;
    }

    #[tokio::test]
    async fn partial_repair_keeps_old_asset_and_recovers_on_rerun() {
        let assets = Arc::new(MemoryAssetStore::new());
        let projects = Arc::new(FailingProjectStore::new(["p2"]));
        let provider = Arc::new(MockProvider::new());
        let lifecycle = AssetLifecycle::<FlakyGallery>::new(
            assets.clone(),
            projects.clone(),
            provider.clone(),
            &GalleryConfig::default(),
        );

        let old = lifecycle.create(vec![1], NewAsset::new("kitchen", AssetCategory::Kitchen)).await.unwrap();
        for id in ["p1", "p2"] {
            let record = StoredProject::new(
                ProjectId::from_string(id),
                GalleryProject::new(id, AssetCategory::Kitchen, AssetRef::id(old.id.clone())),
                Utc::now(),
            );
            projects.insert(record).await.unwrap();
        }

        let err = lifecycle.replace(&old.id, vec![2]).await.unwrap_err();
        let (new_id, failed_ids) = match err {
            GalleryError::PartialReplace { new_id, failed_ids } => (new_id, failed_ids),
            other => panic!("expected PartialReplace, got {other:?}"),
        };
        assert_eq!(failed_ids, vec![ProjectId::from_string("p2")]);

        // Old asset untouched and never deleted from the provider; the
        // repaired project already points at the new asset.
        assert!(assets.get(&old.id).await.unwrap().unwrap().is_active());
        assert!(provider.deleted_ids().is_empty());
        let p1 = projects.get(&ProjectId::from_string("p1")).await.unwrap().unwrap();
        assert_eq!(p1.project.main_asset, AssetRef::id(new_id.clone()));

        // Once the store recovers, re-running the repair converges.
        projects.heal();
        let report = lifecycle
            .resolver()
            .repair_references(&AssetRef::id(old.id.clone()), &AssetRef::id(new_id), MatchMode::Exact)
            .await
            .unwrap();
        assert_eq!(report.updated, 1);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn delete_is_blocked_by_referrers_until_cleared() {
        let h = harness();
        let stored = h.lifecycle.create(vec![1], NewAsset::new("team", AssetCategory::Team)).await.unwrap();
        seed_project(&h.projects, "p1", AssetRef::id(stored.id.clone()), vec![]).await;

        let err = h.lifecycle.delete(&stored.id).await.unwrap_err();
        assert!(matches!(err, GalleryError::ReferencedAsset { count: 1, .. }));
        assert!(h.assets.get(&stored.id).await.unwrap().unwrap().is_active());
        assert!(h.provider.deleted_ids().is_empty());

        // Clear the reference, then delete succeeds.
        h.projects
            .update_refs(&ProjectId::from_string("p1"), AssetRef::id(AssetId::from_string("other")), vec![])
            .await
            .unwrap();
        h.lifecycle.delete(&stored.id).await.unwrap();

        let record = h.assets.get(&stored.id).await.unwrap().unwrap();
        assert!(!record.is_active());
        assert_eq!(h.provider.deleted_ids(), vec![stored.id.clone()]);
    }

    #[tokio::test]
    async fn deleting_unreferenced_assets_leaves_other_projects_alone() {
        let h = harness();
        let a = h.lifecycle.create(vec![1], NewAsset::new("a", AssetCategory::Blog)).await.unwrap();
        let b = h.lifecycle.create(vec![2], NewAsset::new("b", AssetCategory::Blog)).await.unwrap();
        seed_project(&h.projects, "p1", AssetRef::id(AssetId::from_string("unrelated")), vec![]).await;

        h.lifecycle.delete(&a.id).await.unwrap();
        h.lifecycle.delete(&b.id).await.unwrap();

        let project = h.projects.get(&ProjectId::from_string("p1")).await.unwrap().unwrap();
        assert_eq!(project.project.main_asset, AssetRef::id(AssetId::from_string("unrelated")));
        assert_eq!(h.provider.deleted_ids(), vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn delete_provider_failure_keeps_record_soft_deleted() {
        let h = harness();
        let stored = h.lifecycle.create(vec![1], NewAsset::new("x", AssetCategory::General)).await.unwrap();

        h.provider.fail_with(ScriptedFailure::FailDeletes);
        let err = h.lifecycle.delete(&stored.id).await.unwrap_err();
        assert!(matches!(err, GalleryError::Provider(_)));

        // Soft-deleted but retained; the remote delete can be retried.
        let record = h.assets.get(&stored.id).await.unwrap().unwrap();
        assert!(!record.is_active());
    }

    #[tokio::test]
    async fn created_assets_show_up_in_listings_and_stats() {
        use crate::query::{AssetCatalog, ListFilter};

        let h = harness();
        let stored = h
            .lifecycle
            .create(vec![1, 2, 3], NewAsset::new("granite-island", AssetCategory::Kitchen))
            .await
            .unwrap();

        let catalog = AssetCatalog::new(h.assets.clone());
        let kitchens = catalog.list(&ListFilter::new().category(AssetCategory::Kitchen)).await.unwrap();
        assert!(kitchens.iter().any(|a| a.id == stored.id));

        let stats = catalog.stats().await.unwrap();
        assert!(stats.by_category.get("kitchen").copied().unwrap_or(0) >= 1);
        assert_eq!(stats.by_source.get("provider"), Some(&1));
    }

    #[tokio::test]
    async fn from_stores_wires_the_same_instances() {
        struct TestStores {
            assets: Arc<MemoryAssetStore>,
            projects: Arc<MemoryProjectStore>,
            provider: Arc<MockProvider>,
        }

        impl Stores<TestGallery> for TestStores {
            fn assets(&self) -> Arc<MemoryAssetStore> {
                self.assets.clone()
            }

            fn projects(&self) -> Arc<MemoryProjectStore> {
                self.projects.clone()
            }

            fn provider(&self) -> Arc<MockProvider> {
                self.provider.clone()
            }
        }

        let stores = TestStores {
            assets: Arc::new(MemoryAssetStore::new()),
            projects: Arc::new(MemoryProjectStore::new()),
            provider: Arc::new(MockProvider::new()),
        };
        let lifecycle = AssetLifecycle::from_stores(&stores, &GalleryConfig::default());

        let stored = lifecycle.create(vec![1], NewAsset::new("x", AssetCategory::Kitchen)).await.unwrap();
        assert!(stores.assets.get(&stored.id).await.unwrap().is_some());
    }
}
