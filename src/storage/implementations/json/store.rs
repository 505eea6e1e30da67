//! JSON-file-backed implementation of both store traits

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::storage::ids::{AssetId, ProjectId};
use crate::storage::traits::{AssetStore, ProjectStore};
use crate::storage::types::{AssetRef, StoredAsset, StoredProject};

const IMAGES_FILE: &str = "images.json";
const PROJECTS_FILE: &str = "gallery-projects.json";

/// Flat-file store for assets and gallery projects
///
/// Collections are cached in memory and written through as whole files on
/// every mutation. The async mutex is held across the disk write so
/// concurrent writers serialize instead of clobbering each other's
/// snapshots.
pub struct JsonGalleryStore {
    data_dir: PathBuf,
    assets: Mutex<HashMap<String, StoredAsset>>,
    projects: Mutex<HashMap<String, StoredProject>>,
}

impl JsonGalleryStore {
    /// Open a store rooted at `data_dir`, loading any existing collections
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;

        let assets: Vec<StoredAsset> = read_collection(&data_dir.join(IMAGES_FILE)).await?;
        let projects: Vec<StoredProject> = read_collection(&data_dir.join(PROJECTS_FILE)).await?;

        Ok(Self {
            data_dir,
            assets: Mutex::new(assets.into_iter().map(|a| (a.id.as_str().to_string(), a)).collect()),
            projects: Mutex::new(projects.into_iter().map(|p| (p.id.as_str().to_string(), p)).collect()),
        })
    }

    async fn persist_assets(&self, assets: &HashMap<String, StoredAsset>) -> Result<()> {
        let mut records: Vec<&StoredAsset> = assets.values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        write_collection(&self.data_dir.join(IMAGES_FILE), &records).await
    }

    async fn persist_projects(&self, projects: &HashMap<String, StoredProject>) -> Result<()> {
        let mut records: Vec<&StoredProject> = projects.values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        write_collection(&self.data_dir.join(PROJECTS_FILE), &records).await
    }
}

async fn read_collection<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing collection {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("reading collection {}", path.display())),
    }
}

async fn write_collection<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(records)?;
    let temp_path = path.with_extension("json.tmp");

    let mut file = fs::File::create(&temp_path)
        .await
        .with_context(|| format!("creating {}", temp_path.display()))?;
    file.write_all(&bytes).await?;
    file.sync_all().await?;
    fs::rename(&temp_path, path)
        .await
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl AssetStore for JsonGalleryStore {
    async fn insert(&self, record: StoredAsset) -> Result<()> {
        let mut assets = self.assets.lock().await;
        assets.insert(record.id.as_str().to_string(), record);
        self.persist_assets(&assets).await
    }

    async fn get(&self, id: &AssetId) -> Result<Option<StoredAsset>> {
        Ok(self.assets.lock().await.get(id.as_str()).cloned())
    }

    async fn update(&self, record: &StoredAsset) -> Result<bool> {
        let mut assets = self.assets.lock().await;
        if !assets.contains_key(record.id.as_str()) {
            return Ok(false);
        }
        assets.insert(record.id.as_str().to_string(), record.clone());
        self.persist_assets(&assets).await?;
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<StoredAsset>> {
        Ok(self.assets.lock().await.values().cloned().collect())
    }

    async fn remove(&self, id: &AssetId) -> Result<bool> {
        let mut assets = self.assets.lock().await;
        if assets.remove(id.as_str()).is_none() {
            return Ok(false);
        }
        self.persist_assets(&assets).await?;
        Ok(true)
    }
}

#[async_trait]
impl ProjectStore for JsonGalleryStore {
    async fn insert(&self, record: StoredProject) -> Result<()> {
        let mut projects = self.projects.lock().await;
        projects.insert(record.id.as_str().to_string(), record);
        self.persist_projects(&projects).await
    }

    async fn get(&self, id: &ProjectId) -> Result<Option<StoredProject>> {
        Ok(self.projects.lock().await.get(id.as_str()).cloned())
    }

    async fn list_page(&self, offset: usize, limit: usize) -> Result<Vec<StoredProject>> {
        let projects = self.projects.lock().await;
        let mut all: Vec<&StoredProject> = projects.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.projects.lock().await.len())
    }

    async fn update_refs(&self, id: &ProjectId, main_asset: AssetRef, assets: Vec<AssetRef>) -> Result<bool> {
        let mut projects = self.projects.lock().await;
        match projects.get_mut(id.as_str()) {
            Some(record) => {
                record.project.main_asset = main_asset;
                record.project.assets = assets;
                record.updated_at = Utc::now();
            }
            None => return Ok(false),
        }
        self.persist_projects(&projects).await?;
        Ok(true)
    }
}
