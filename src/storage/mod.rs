//! Storage abstractions for asset and project records
//!
//! This module provides traits and implementations for the metadata store.
//! Two implementations are available:
//!
//! - `MemoryAssetStore` / `MemoryProjectStore` - in-memory (default, no
//!   persistence)
//! - `JsonGalleryStore` - flat-file persisted collections
//!
//! All implement the same store traits, making them interchangeable.

pub mod ids;
pub mod implementations;
pub mod traits;
pub mod types;

pub use ids::{AssetId, ProjectId};
pub use implementations::json::JsonGalleryStore;
pub use implementations::memory::{MemoryAssetStore, MemoryProjectStore};
pub use traits::{AssetStore, GalleryTypes, ProjectStore, Stores};
pub use types::{
    AssetCategory, AssetPatch, AssetRef, AssetSource, GalleryProject, ImageAsset, StoredAsset,
    StoredProject,
};
