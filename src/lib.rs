//! Asset and reference consistency core for gallery-driven sites
//!
//! This crate manages the lifecycle of image assets — upload, metadata
//! update, replacement, deletion — and keeps every gallery project that
//! references an asset consistent when the asset's location changes.
//!
//! The invariant it protects: every reference held by an active project
//! resolves to an active asset. The two stores involved (metadata and
//! remote bytes) share no transaction, so operations are ordered to make
//! the irreversible step last and every intermediate state safe:
//! provider write, store write, reference repair, provider delete-of-old.
//!
//! # Example
//!
//! ```ignore
//! use gallery_core::{AssetCategory, AssetLifecycle, GalleryConfig, NewAsset};
//!
//! let lifecycle = AssetLifecycle::from_stores(&stores, &config);
//! let asset = lifecycle
//!     .create(bytes, NewAsset::new("granite-island", AssetCategory::Kitchen))
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod provider;
pub mod query;
pub mod resolver;
pub mod storage;
pub mod transform;

pub use config::{GalleryConfig, ProviderConfig};
pub use error::GalleryError;
pub use lifecycle::{AssetLifecycle, NewAsset};
pub use provider::{
    FsAssetProvider, HttpAssetProvider, MockProvider, ProviderError, RemoteAssetProvider,
    RemoteUpload, UploadRequest,
};
pub use query::{AssetCatalog, AssetStats, ListFilter};
pub use resolver::{MatchMode, ReferenceResolver, RepairReport};
pub use storage::{
    AssetCategory, AssetId, AssetPatch, AssetRef, AssetSource, AssetStore, GalleryProject,
    GalleryTypes, ImageAsset, JsonGalleryStore, MemoryAssetStore, MemoryProjectStore, ProjectId,
    ProjectStore, StoredAsset, StoredProject, Stores,
};
pub use transform::{CropMode, OutputFormat, PresentationSize, Quality, Transform};
