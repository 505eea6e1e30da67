//! Local-fallback asset provider
//!
//! Content-addressed storage on the local filesystem for deployments (or
//! outages) without a remote provider. Files are stored by their SHA-256
//! hash in a sharded directory structure: `{root}/{hash[0:2]}/{hash}.{ext}`.
//! Identical payloads deduplicate to the same id.
//!
//! Assets stored here carry `source = local-fallback`: their locator is a
//! plain path, so derived renditions are not possible and consumers always
//! get the original bytes.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{sniff_format, ProviderError, RemoteAssetProvider, RemoteUpload, UploadRequest};
use crate::storage::ids::AssetId;
use crate::storage::types::AssetSource;

const ID_PREFIX: &str = "local-";

/// Filesystem provider serving as the local fallback
#[derive(Debug, Clone)]
pub struct FsAssetProvider {
    root: PathBuf,
    /// URL prefix under which `root` is served (e.g. `/uploads`)
    public_prefix: String,
}

impl FsAssetProvider {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into();
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    fn hash_of(bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    fn shard_dir(&self, hash: &str) -> PathBuf {
        self.root.join(&hash[0..2])
    }

    fn io_err(context: &str, e: std::io::Error) -> ProviderError {
        ProviderError::Unreachable(format!("{context}: {e}"))
    }
}

#[async_trait]
impl RemoteAssetProvider for FsAssetProvider {
    async fn upload(&self, request: UploadRequest) -> Result<RemoteUpload, ProviderError> {
        let format = sniff_format(&request.bytes)
            .ok_or_else(|| ProviderError::Rejected("payload is not a supported image format".to_string()))?;

        let hash = Self::hash_of(&request.bytes);
        let shard = self.shard_dir(&hash);
        let path = shard.join(format!("{hash}.{format}"));
        let url = format!("{}/{}/{hash}.{format}", self.public_prefix, &hash[0..2]);
        let upload = RemoteUpload {
            id: AssetId::from_string(format!("{ID_PREFIX}{hash}")),
            url,
            width: 0,
            height: 0,
            format: format.to_string(),
            bytes: request.bytes.len() as u64,
        };

        // Deduplication: identical content is already stored.
        match fs::try_exists(&path).await {
            Ok(true) => return Ok(upload),
            Ok(false) => {}
            Err(e) => return Err(Self::io_err("probing store", e)),
        }

        fs::create_dir_all(&shard)
            .await
            .map_err(|e| ProviderError::Unreachable(format!("creating shard dir: {e}")))?;

        // Write atomically using a temp file.
        let temp_path = path.with_extension("tmp");
        let write = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&request.bytes).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &path).await
        };
        write
            .await
            .map_err(|e| ProviderError::Unreachable(format!("writing payload: {e}")))?;

        tracing::debug!(id = %upload.id, path = %path.display(), "stored payload locally");
        Ok(upload)
    }

    async fn delete(&self, id: &AssetId) -> Result<(), ProviderError> {
        let Some(hash) = id.as_str().strip_prefix(ID_PREFIX) else {
            // Not one of ours; nothing to remove.
            return Ok(());
        };
        if hash.len() < 2 {
            return Ok(());
        }

        let shard = self.shard_dir(hash);
        let mut entries = match fs::read_dir(&shard).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Self::io_err("reading shard dir", e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("scanning shard dir: {e}")))?
        {
            let path = entry.path();
            if path.file_stem().and_then(|s| s.to_str()) == Some(hash) {
                fs::remove_file(&path)
                    .await
                    .map_err(|e| ProviderError::Unreachable(format!("removing payload: {e}")))?;
            }
        }
        Ok(())
    }

    fn source(&self) -> AssetSource {
        AssetSource::LocalFallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use uuid::Uuid;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn temp_provider() -> FsAssetProvider {
        let dir = env::temp_dir().join(format!("fs_provider_test_{}", Uuid::new_v4()));
        FsAssetProvider::new(dir, "/uploads")
    }

    fn png_payload(tail: &[u8]) -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(tail);
        bytes
    }

    #[tokio::test]
    async fn upload_stores_and_deduplicates() {
        let provider = temp_provider();
        let payload = png_payload(b"pixels");

        let first = provider.upload(UploadRequest::new(payload.clone(), "gallery/kitchen")).await.unwrap();
        let second = provider.upload(UploadRequest::new(payload, "gallery/kitchen")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.id.as_str().starts_with("local-"));
        assert!(first.url.starts_with("/uploads/"));
        assert_eq!(first.format, "png");
        assert_eq!(provider.source(), AssetSource::LocalFallback);

        fs::remove_dir_all(&provider.root).await.ok();
    }

    #[tokio::test]
    async fn upload_rejects_non_image_payloads() {
        let provider = temp_provider();
        let err = provider
            .upload(UploadRequest::new(b"just text".to_vec(), "gallery/general"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rejected(_)));

        fs::remove_dir_all(&provider.root).await.ok();
    }

    #[tokio::test]
    async fn delete_removes_stored_payload_and_tolerates_missing() {
        let provider = temp_provider();
        let upload = provider
            .upload(UploadRequest::new(png_payload(b"delete me"), "gallery/blog"))
            .await
            .unwrap();

        provider.delete(&upload.id).await.unwrap();
        // Second delete is a no-op, as is deleting an id we never stored.
        provider.delete(&upload.id).await.unwrap();
        provider.delete(&AssetId::from_string("gallery/kitchen/abc")).await.unwrap();

        fs::remove_dir_all(&provider.root).await.ok();
    }
}
