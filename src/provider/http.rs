//! HTTP-backed remote asset provider
//!
//! Vendor-neutral client for an object-storage + transformation service.
//! The wire shape follows the common hosted-media convention: uploads
//! return a stable public id and a secure delivery URL; deletes are keyed
//! by that id. Nothing here assumes a specific vendor beyond that.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ProviderError, RemoteAssetProvider, RemoteUpload, UploadRequest};
use crate::storage::ids::AssetId;
use crate::storage::types::AssetSource;

#[derive(Serialize)]
struct UploadBody<'a> {
    data: String,
    folder: &'a str,
    tags: &'a [String],
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    format: String,
    #[serde(default)]
    bytes: u64,
}

/// Remote provider speaking JSON over HTTP
pub struct HttpAssetProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAssetProvider {
    /// Build a client with the given endpoint and per-call deadline
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Unreachable(e.to_string())
        }
    }
}

#[async_trait]
impl RemoteAssetProvider for HttpAssetProvider {
    async fn upload(&self, request: UploadRequest) -> Result<RemoteUpload, ProviderError> {
        let body = UploadBody {
            data: STANDARD.encode(&request.bytes),
            folder: &request.folder,
            tags: &request.tags,
        };

        let response = self
            .client
            .post(self.endpoint("upload"))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.is_client_error() {
            let reason = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(ProviderError::Rejected(reason));
        }
        if !status.is_success() {
            return Err(ProviderError::Unreachable(format!("upload returned {status}")));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("malformed upload response: {e}")))?;

        tracing::debug!(id = %parsed.public_id, bytes = parsed.bytes, "remote upload complete");

        Ok(RemoteUpload {
            id: AssetId::from_string(parsed.public_id),
            url: parsed.secure_url,
            width: parsed.width,
            height: parsed.height,
            format: parsed.format,
            bytes: parsed.bytes,
        })
    }

    async fn delete(&self, id: &AssetId) -> Result<(), ProviderError> {
        let response = self
            .client
            .delete(self.endpoint("assets"))
            .query(&[("id", id.as_str())])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        // A missing remote asset means the delete already happened.
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        if status.is_client_error() {
            let reason = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(ProviderError::Rejected(reason));
        }
        Err(ProviderError::Unreachable(format!("delete returned {status}")))
    }

    fn source(&self) -> AssetSource {
        AssetSource::Provider
    }
}
