//! Report types handed to whoever decides what to do with outliers

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::version::outlier::OutlierSplit;
use crate::version::semver::TagVersion;

/// Curation result for a single image; every tag is in its published form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub image: String,
    /// Greatest tag of the release line
    pub latest: Option<String>,
    /// Release line, ascending
    pub remaining: Vec<String>,
    /// Tags after the first large major-version gap, ascending
    pub outliers: Vec<String>,
    /// Tags that are not semantic versions, in registry order
    pub skipped: Vec<String>,
}

impl ImageReport {
    pub fn new(image: impl Into<String>, split: OutlierSplit<TagVersion>, skipped: Vec<String>) -> Self {
        let originals = |versions: Vec<TagVersion>| -> Vec<String> {
            versions.iter().map(|v| v.original().to_string()).collect()
        };

        Self {
            image: image.into(),
            latest: split.latest_remaining().map(|v| v.original().to_string()),
            remaining: originals(split.remaining),
            outliers: originals(split.outliers),
            skipped,
        }
    }

    pub fn has_outliers(&self) -> bool {
        !self.outliers.is_empty()
    }
}

/// Curation result for a batch of images
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationReport {
    pub generated_at: DateTime<Utc>,
    /// Reports in the order the images were requested
    pub images: IndexMap<String, ImageReport>,
    /// Error message per image that could not be curated
    pub failures: IndexMap<String, String>,
}

impl CurationReport {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            images: IndexMap::new(),
            failures: IndexMap::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
