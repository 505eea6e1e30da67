//! Gallery project types and asset references

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::ids::{AssetId, ProjectId};
use crate::storage::types::asset::AssetCategory;

/// A reference held by a project to an image asset
///
/// Records written under this design reference assets by stable id. Legacy
/// records stored the raw URL instead; that shape is tolerated on load and
/// healed by the reference resolver, never written for new refs.
///
/// Serialized as a bare string so legacy project files stay readable:
/// URL-shaped values (`http(s)://…` or rooted paths) classify as locators,
/// everything else as ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetRef {
    Id(AssetId),
    Locator(String),
}

impl AssetRef {
    /// Classify a stored string as an id or a legacy locator
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") || value.starts_with('/') {
            Self::Locator(value.to_string())
        } else {
            Self::Id(AssetId::from_string(value))
        }
    }

    pub fn id(id: AssetId) -> Self {
        Self::Id(id)
    }

    pub fn locator(locator: impl Into<String>) -> Self {
        Self::Locator(locator.into())
    }

    pub fn as_id(&self) -> Option<&AssetId> {
        match self {
            Self::Id(id) => Some(id),
            Self::Locator(_) => None,
        }
    }

    pub fn as_locator(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Locator(locator) => Some(locator),
        }
    }

    /// Whether this ref points at the given target (exact match only)
    pub fn matches(&self, target: &AssetRef) -> bool {
        self == target
    }
}

impl From<String> for AssetRef {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<AssetRef> for String {
    fn from(value: AssetRef) -> Self {
        match value {
            AssetRef::Id(id) => id.into_string(),
            AssetRef::Locator(locator) => locator,
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Locator(locator) => f.write_str(locator),
        }
    }
}

/// Gallery project record
///
/// Presentation fields are not subject to the consistency protocol; only
/// `main_asset` and `assets` participate in reference repair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GalleryProject {
    pub title: String,
    pub category: AssetCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub sort_order: u32,
    pub is_active: bool,
    pub main_asset: AssetRef,
    #[serde(default)]
    pub assets: Vec<AssetRef>,
}

impl GalleryProject {
    pub fn new(title: impl Into<String>, category: AssetCategory, main_asset: AssetRef) -> Self {
        Self {
            title: title.into(),
            category,
            description: String::new(),
            location: String::new(),
            features: Vec::new(),
            sort_order: 0,
            is_active: true,
            main_asset,
            assets: Vec::new(),
        }
    }

    pub fn with_assets(mut self, assets: Vec<AssetRef>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// All refs held by this project, main asset first
    pub fn all_refs(&self) -> impl Iterator<Item = &AssetRef> {
        std::iter::once(&self.main_asset).chain(self.assets.iter())
    }

    /// Whether any held ref matches the target exactly
    pub fn refers_to(&self, target: &AssetRef) -> bool {
        self.all_refs().any(|r| r.matches(target))
    }
}

/// A stored project with id and timestamps
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredProject {
    pub id: ProjectId,
    #[serde(flatten)]
    pub project: GalleryProject,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredProject {
    pub fn new(id: ProjectId, project: GalleryProject, created_at: DateTime<Utc>) -> Self {
        Self { id, project, created_at, updated_at: created_at }
    }

    pub fn is_active(&self) -> bool {
        self.project.is_active
    }
}
