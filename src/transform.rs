//! Derived-rendition URL computation
//!
//! Pure string work: compose a transformation fragment from parameters and
//! splice it into a provider locator's `/upload/` path segment. Locators
//! without that segment (local-fallback paths, external URLs) pass through
//! unchanged, so a caller can always render *something*.

use serde::{Deserialize, Serialize};
use std::fmt;

const UPLOAD_SEGMENT: &str = "/upload/";

/// Requested quality for a derived rendition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Auto,
    Fixed(u8),
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(q) => write!(f, "{q}"),
        }
    }
}

/// How the image is fitted when both dimensions are constrained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    Fill,
    Fit,
    Scale,
    Crop,
}

impl CropMode {
    fn code(&self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Fit => "fit",
            Self::Scale => "scale",
            Self::Crop => "crop",
        }
    }
}

/// Requested output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Auto,
    WebP,
    Jpeg,
    Png,
}

impl OutputFormat {
    fn code(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::WebP => "webp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Transformation parameters for a derived rendition
///
/// All fields optional; an empty transform applies defaults only
/// (automatic quality and format).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<Quality>,
    pub format: Option<OutputFormat>,
    pub crop: Option<CropMode>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn crop(mut self, crop: CropMode) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Deterministic parameter fragment
    ///
    /// Dimension block first (with its crop mode), then quality, then
    /// format: `w_800,h_600,c_fill,q_auto,f_auto`. Crop is only emitted
    /// alongside at least one dimension.
    pub fn fragment(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if self.width.is_some() || self.height.is_some() {
            if let Some(w) = self.width {
                parts.push(format!("w_{w}"));
            }
            if let Some(h) = self.height {
                parts.push(format!("h_{h}"));
            }
            parts.push(format!("c_{}", self.crop.unwrap_or(CropMode::Fill).code()));
        }

        parts.push(format!("q_{}", self.quality.unwrap_or(Quality::Auto)));
        parts.push(format!("f_{}", self.format.unwrap_or(OutputFormat::Auto).code()));

        parts.join(",")
    }

    /// Splice the fragment into a provider locator
    ///
    /// Returns the locator unchanged when it has no `/upload/` segment.
    pub fn apply(&self, locator: &str) -> String {
        match locator.split_once(UPLOAD_SEGMENT) {
            Some((base, rest)) => format!("{base}{UPLOAD_SEGMENT}{}/{rest}", self.fragment()),
            None => locator.to_string(),
        }
    }
}

/// Named presentation sizes used by gallery rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationSize {
    Thumbnail,
    Medium,
    Large,
}

impl PresentationSize {
    /// Preset transform for this size
    pub fn transform(&self) -> Transform {
        match self {
            Self::Thumbnail => Transform::new().width(300).height(300).crop(CropMode::Fill),
            Self::Medium => Transform::new().width(600).height(400).crop(CropMode::Fill),
            Self::Large => Transform::new().width(1200).height(800).crop(CropMode::Scale),
        }
    }
}
