//! In-memory AssetStore implementation

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::storage::ids::AssetId;
use crate::storage::traits::AssetStore;
use crate::storage::types::StoredAsset;

/// In-memory asset store, used as the default backend and in tests
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: Mutex<HashMap<String, StoredAsset>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn insert(&self, record: StoredAsset) -> Result<()> {
        let mut assets = self.assets.lock().unwrap();
        assets.insert(record.id.as_str().to_string(), record);
        Ok(())
    }

    async fn get(&self, id: &AssetId) -> Result<Option<StoredAsset>> {
        let assets = self.assets.lock().unwrap();
        Ok(assets.get(id.as_str()).cloned())
    }

    async fn update(&self, record: &StoredAsset) -> Result<bool> {
        let mut assets = self.assets.lock().unwrap();
        match assets.get_mut(record.id.as_str()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<StoredAsset>> {
        let assets = self.assets.lock().unwrap();
        Ok(assets.values().cloned().collect())
    }

    async fn remove(&self, id: &AssetId) -> Result<bool> {
        Ok(self.assets.lock().unwrap().remove(id.as_str()).is_some())
    }
}
