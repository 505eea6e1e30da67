//! Image asset types for storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::ids::AssetId;

/// Closed category set used for filtering, folder layout and stats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Kitchen,
    Bathroom,
    Commercial,
    General,
    Blog,
    Team,
}

impl AssetCategory {
    /// Stable lowercase name, used for provider folders and stat keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
            Self::Commercial => "commercial",
            Self::General => "general",
            Self::Blog => "blog",
            Self::Team => "team",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the asset bytes live
///
/// Only provider-backed assets can have derived renditions computed from
/// their locator; local-fallback assets always serve the original bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSource {
    #[serde(rename = "provider")]
    Provider,
    #[serde(rename = "local-fallback")]
    LocalFallback,
}

impl AssetSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::LocalFallback => "local-fallback",
        }
    }
}

/// Image asset metadata record
///
/// The identity of an asset is its [`AssetId`]; everything here is
/// descriptive. `locator` is the resolvable URL consumers fetch, and is
/// rewritten in referencing projects whenever the asset is replaced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Display name (derived from the uploaded filename, not identity)
    pub name: String,
    /// Resolvable URL for the original rendition
    pub locator: String,
    pub category: AssetCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Size in bytes as reported by the provider
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub format: String,
    /// Soft-delete flag; inactive assets are kept for audit and rollback
    pub is_active: bool,
    pub source: AssetSource,
}

impl ImageAsset {
    /// Create a new active asset with required fields
    pub fn new(name: impl Into<String>, locator: impl Into<String>, category: AssetCategory) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            category,
            tags: Vec::new(),
            description: String::new(),
            size: 0,
            width: 0,
            height: 0,
            format: String::new(),
            is_active: true,
            source: AssetSource::Provider,
        }
    }

    /// Set the free-form tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the provider-reported dimensions and byte size
    pub fn with_dimensions(mut self, width: u32, height: u32, size: u64) -> Self {
        self.width = width;
        self.height = height;
        self.size = size;
        self
    }

    /// Set the provider-reported format
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Set the byte source
    pub fn with_source(mut self, source: AssetSource) -> Self {
        self.source = source;
        self
    }
}

/// Metadata-only patch applied by the lifecycle `update` operation
///
/// Locator, source and provider state are never patched; replacing bytes
/// goes through the full replace protocol instead.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<AssetCategory>,
    pub tags: Option<Vec<String>>,
}

impl AssetPatch {
    /// Apply the patch to an asset record in place
    pub fn apply_to(&self, asset: &mut ImageAsset) {
        if let Some(name) = &self.name {
            asset.name = name.clone();
        }
        if let Some(description) = &self.description {
            asset.description = description.clone();
        }
        if let Some(category) = self.category {
            asset.category = category;
        }
        if let Some(tags) = &self.tags {
            asset.tags = tags.clone();
        }
    }
}

/// A stored asset with its id and upload timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredAsset {
    pub id: AssetId,
    #[serde(flatten)]
    pub asset: ImageAsset,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredAsset {
    pub fn new(id: AssetId, asset: ImageAsset, uploaded_at: DateTime<Utc>) -> Self {
        Self { id, asset, uploaded_at }
    }

    pub fn locator(&self) -> &str {
        &self.asset.locator
    }

    pub fn category(&self) -> AssetCategory {
        self.asset.category
    }

    pub fn is_active(&self) -> bool {
        self.asset.is_active
    }

    pub fn source(&self) -> AssetSource {
        self.asset.source
    }
}
