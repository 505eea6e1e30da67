//! Remote asset providers
//!
//! A provider owns byte payloads and derived renditions; the metadata
//! store owns everything relational. The core only requires three
//! capabilities of a provider: store bytes and hand back a stable id plus
//! a delivery URL, delete by id, and (for provider-backed assets) derive
//! transformed URLs from the locator — the last of which is pure string
//! work handled in [`crate::transform`].

mod fs;
mod http;
mod mock;

pub use fs::FsAssetProvider;
pub use http::HttpAssetProvider;
pub use mock::{MockProvider, ProviderCall, ScriptedFailure};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::storage::ids::AssetId;
use crate::storage::types::{AssetCategory, AssetSource};

/// Upload input: raw bytes plus placement metadata
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    /// Deterministic folder, derived from the asset category
    pub folder: String,
    pub tags: Vec<String>,
}

impl UploadRequest {
    pub fn new(bytes: Vec<u8>, folder: impl Into<String>) -> Self {
        Self { bytes, folder: folder.into(), tags: Vec::new() }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Folder layout shared by all providers: `{prefix}/{category}`
    pub fn folder_for(prefix: &str, category: AssetCategory) -> String {
        format!("{prefix}/{category}")
    }
}

/// Successful upload result as reported by the provider
#[derive(Clone, Debug)]
pub struct RemoteUpload {
    /// Stable identifier for the asset's remote lifetime
    pub id: AssetId,
    /// Base delivery URL
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub bytes: u64,
}

/// Provider failures, surfaced untouched to the lifecycle layer
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider refused the payload (size, type, validation)
    #[error("provider rejected payload: {0}")]
    Rejected(String),
    /// The provider could not be reached or answered with a server error
    #[error("provider unreachable: {0}")]
    Unreachable(String),
    /// The call exceeded its deadline; treated as full failure, never as
    /// partial success
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// External object storage plus on-the-fly transformation service
#[async_trait]
pub trait RemoteAssetProvider: Send + Sync {
    /// Store bytes, returning a stable id and a base delivery URL
    async fn upload(&self, request: UploadRequest) -> Result<RemoteUpload, ProviderError>;

    /// Delete the remote asset by id
    ///
    /// Deleting an unknown id is not an error; delete is idempotent so the
    /// lifecycle can retry it safely.
    async fn delete(&self, id: &AssetId) -> Result<(), ProviderError>;

    /// Provenance tag recorded on assets this provider stores
    fn source(&self) -> AssetSource;
}

/// Sniff an image format from magic bytes
///
/// Providers that validate locally (the fs fallback) use this to reject
/// non-image payloads the way the remote service would.
pub fn sniff_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_image_formats() {
        assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), Some("jpg"));
        assert_eq!(sniff_format(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00]), Some("png"));
        assert_eq!(sniff_format(b"GIF89a-rest"), Some("gif"));

        let mut webp = b"RIFF".to_vec();
        webp.extend_from_slice(&[0x10, 0x00, 0x00, 0x00]);
        webp.extend_from_slice(b"WEBPVP8 ");
        assert_eq!(sniff_format(&webp), Some("webp"));

        assert_eq!(sniff_format(b"<!doctype html>"), None);
        assert_eq!(sniff_format(&[]), None);
    }

    #[test]
    fn folder_layout_is_deterministic() {
        assert_eq!(UploadRequest::folder_for("gallery", AssetCategory::Kitchen), "gallery/kitchen");
        assert_eq!(UploadRequest::folder_for("gallery", AssetCategory::Team), "gallery/team");
    }
}
