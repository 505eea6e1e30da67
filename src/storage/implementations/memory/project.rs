//! In-memory ProjectStore implementation

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::storage::ids::ProjectId;
use crate::storage::traits::ProjectStore;
use crate::storage::types::{AssetRef, StoredProject};

/// In-memory project store, used as the default backend and in tests
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: Mutex<HashMap<String, StoredProject>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn insert(&self, record: StoredProject) -> Result<()> {
        let mut projects = self.projects.lock().unwrap();
        projects.insert(record.id.as_str().to_string(), record);
        Ok(())
    }

    async fn get(&self, id: &ProjectId) -> Result<Option<StoredProject>> {
        let projects = self.projects.lock().unwrap();
        Ok(projects.get(id.as_str()).cloned())
    }

    async fn list_page(&self, offset: usize, limit: usize) -> Result<Vec<StoredProject>> {
        let projects = self.projects.lock().unwrap();
        let mut all: Vec<&StoredProject> = projects.values().collect();
        // Id order keeps pagination stable while refs are rewritten.
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.projects.lock().unwrap().len())
    }

    async fn update_refs(&self, id: &ProjectId, main_asset: AssetRef, assets: Vec<AssetRef>) -> Result<bool> {
        let mut projects = self.projects.lock().unwrap();
        match projects.get_mut(id.as_str()) {
            Some(record) => {
                record.project.main_asset = main_asset;
                record.project.assets = assets;
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
