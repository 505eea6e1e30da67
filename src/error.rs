//! Error taxonomy for lifecycle and query operations
//!
//! Provider failures propagate typed; metadata store failures are carried
//! transparently. Reference-repair batch failures are *not* errors at this
//! level: they come back inside a repair report so the caller can decide
//! whether to retry or abort.

use std::time::Duration;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::storage::ids::{AssetId, ProjectId};

/// Failures surfaced by the asset lifecycle and query layers
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The provider rejected the payload or could not be reached during an
    /// upload. Never retried automatically; no record was written.
    #[error("upload failed: {reason}")]
    Upload { reason: String },

    /// Unknown asset id. Terminal; retrying cannot help.
    #[error("asset not found: {id}")]
    NotFound { id: AssetId },

    /// Delete blocked because active projects still reference the asset.
    /// Terminal until the references are cleared.
    #[error("asset {id} is still referenced by {count} project(s)")]
    ReferencedAsset { id: AssetId, count: usize },

    /// Replace created the new asset but could not repair every reference.
    /// The old asset is retained untouched; re-running the repair recovers.
    /// Nothing dangles: every unrepaired ref still resolves to the old
    /// asset.
    #[error("replace incomplete: new asset {new_id} created, {} project(s) not repaired", .failed_ids.len())]
    PartialReplace { new_id: AssetId, failed_ids: Vec<ProjectId> },

    /// The provider call exceeded its deadline. Treated as full failure:
    /// upload-path timeouts perform no store mutation, so the whole
    /// operation is safe to retry.
    #[error("provider call timed out after {limit:?}")]
    ProviderTimeout { limit: Duration },

    /// Typed pass-through for provider failures outside the upload path
    /// (e.g. the hard-delete step).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Metadata store failure.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl GalleryError {
    /// Map an upload-path provider failure
    ///
    /// Timeouts keep their own variant so callers can distinguish
    /// "definitely not stored, retry freely" from "provider said no".
    pub(crate) fn from_upload_failure(e: ProviderError) -> Self {
        match e {
            ProviderError::Timeout(limit) => Self::ProviderTimeout { limit },
            other => Self::Upload { reason: other.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_failure_mapping_preserves_timeouts() {
        let limit = Duration::from_secs(10);
        let err = GalleryError::from_upload_failure(ProviderError::Timeout(limit));
        assert!(matches!(err, GalleryError::ProviderTimeout { limit: l } if l == limit));

        let err = GalleryError::from_upload_failure(ProviderError::Rejected("too large".into()));
        assert!(matches!(err, GalleryError::Upload { .. }));
    }

    #[test]
    fn messages_name_the_offending_records() {
        let err = GalleryError::ReferencedAsset { id: AssetId::from_string("abc"), count: 2 };
        assert_eq!(err.to_string(), "asset abc is still referenced by 2 project(s)");

        let err = GalleryError::NotFound { id: AssetId::from_string("ghost") };
        assert!(err.to_string().contains("ghost"));
    }
}
