//! Scripted provider for lifecycle and resolver tests
//!
//! Deterministic ids, recorded calls, and failure modes that can be
//! toggled mid-test to exercise the partial-failure paths.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{ProviderError, RemoteAssetProvider, RemoteUpload, UploadRequest};
use crate::storage::ids::AssetId;
use crate::storage::types::AssetSource;

/// Failure mode applied to subsequent calls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// Uploads fail as rejected payloads
    RejectUploads,
    /// Uploads fail as unreachable
    UnreachableUploads,
    /// Uploads fail with a provider-side timeout
    TimeoutUploads,
    /// Uploads hang long enough to trip the caller's deadline
    HangUploads,
    /// Deletes fail as unreachable
    FailDeletes,
}

/// A recorded provider call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderCall {
    Upload { folder: String },
    Delete { id: AssetId },
}

/// In-memory provider double
pub struct MockProvider {
    counter: AtomicU64,
    calls: Mutex<Vec<ProviderCall>>,
    failure: Mutex<Option<ScriptedFailure>>,
    source: AssetSource,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            source: AssetSource::Provider,
        }
    }

    /// Apply a failure mode to subsequent calls
    pub fn fail_with(&self, failure: ScriptedFailure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    /// Clear any scripted failure
    pub fn heal(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids passed to `delete`, in order
    pub fn deleted_ids(&self) -> Vec<AssetId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ProviderCall::Delete { id } => Some(id),
                ProviderCall::Upload { .. } => None,
            })
            .collect()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteAssetProvider for MockProvider {
    async fn upload(&self, request: UploadRequest) -> Result<RemoteUpload, ProviderError> {
        let failure = *self.failure.lock().unwrap();
        match failure {
            Some(ScriptedFailure::RejectUploads) => {
                return Err(ProviderError::Rejected("scripted rejection".to_string()))
            }
            Some(ScriptedFailure::UnreachableUploads) => {
                return Err(ProviderError::Unreachable("scripted outage".to_string()))
            }
            Some(ScriptedFailure::TimeoutUploads) => {
                return Err(ProviderError::Timeout(Duration::from_secs(5)))
            }
            Some(ScriptedFailure::HangUploads) => {
                tokio::time::sleep(Duration::from_secs(300)).await;
            }
            Some(ScriptedFailure::FailDeletes) | None => {}
        }

        self.record(ProviderCall::Upload { folder: request.folder.clone() });
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RemoteUpload {
            id: AssetId::from_string(format!("mock-{n}")),
            url: format!("https://mock.cdn/image/upload/v1/mock-{n}.jpg"),
            width: 800,
            height: 600,
            format: "jpg".to_string(),
            bytes: request.bytes.len() as u64,
        })
    }

    async fn delete(&self, id: &AssetId) -> Result<(), ProviderError> {
        if *self.failure.lock().unwrap() == Some(ScriptedFailure::FailDeletes) {
            return Err(ProviderError::Unreachable("scripted delete outage".to_string()));
        }
        self.record(ProviderCall::Delete { id: id.clone() });
        Ok(())
    }

    fn source(&self) -> AssetSource {
        self.source
    }
}
