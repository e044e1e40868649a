//! Fetch → parse → split for one or many images

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::config::{CuratorConfig, DEFAULT_FETCH_STAGGER_DELAY_MS, DEFAULT_FETCH_TIMEOUT_MS};
use crate::curator::report::{CurationReport, ImageReport};
use crate::version::error::{RegistryError, SplitError};
use crate::version::outlier::{DEFAULT_MIN_MAJOR_GAP, split_outliers_with_gap};
use crate::version::registry::Registry;
use crate::version::tags::discover_versions;
use crate::version::types::{ImageRef, RegistryKind};

#[derive(Debug, Error)]
pub enum CurateError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("No registry configured for {0}")]
    NoRegistry(RegistryKind),

    #[error("Fetching tags timed out after {0:?}")]
    Timeout(Duration),
}

/// Knobs for a curation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurationPolicy {
    pub min_major_gap: u64,
    pub fetch_timeout: Duration,
    pub stagger_delay: Duration,
}

impl Default for CurationPolicy {
    fn default() -> Self {
        Self {
            min_major_gap: DEFAULT_MIN_MAJOR_GAP,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            stagger_delay: Duration::from_millis(DEFAULT_FETCH_STAGGER_DELAY_MS),
        }
    }
}

impl From<&CuratorConfig> for CurationPolicy {
    fn from(config: &CuratorConfig) -> Self {
        Self {
            min_major_gap: config.outliers.min_major_gap,
            fetch_timeout: Duration::from_millis(config.fetch.timeout_ms),
            stagger_delay: Duration::from_millis(config.fetch.stagger_delay_ms),
        }
    }
}

/// Split an already known list of raw tags
pub fn split_tags<S: AsRef<str>>(
    image: &str,
    tags: &[S],
    min_major_gap: u64,
) -> Result<ImageReport, SplitError> {
    let discovery = discover_versions(tags);
    let split = split_outliers_with_gap(discovery.versions, min_major_gap)?;

    Ok(ImageReport::new(image, split, discovery.skipped))
}

/// Fetch the tags of one image and split them
pub async fn curate_image(
    registry: &dyn Registry,
    image: &ImageRef,
    policy: &CurationPolicy,
) -> Result<ImageReport, CurateError> {
    let tags = timeout(policy.fetch_timeout, registry.fetch_tags(image))
        .await
        .map_err(|_| CurateError::Timeout(policy.fetch_timeout))??;
    debug!("Fetched {} tags for {}", tags.len(), image);

    let report = split_tags(&image.to_string(), &tags.tags, policy.min_major_gap)?;

    if report.has_outliers() {
        info!(
            "{}: {} remaining, {} outliers ({})",
            image,
            report.remaining.len(),
            report.outliers.len(),
            report.outliers.join(", ")
        );
    } else {
        info!("{}: {} remaining, no outliers", image, report.remaining.len());
    }

    Ok(report)
}

/// Curate many images concurrently
///
/// Fetches start staggered by `policy.stagger_delay` to avoid rate limiting.
/// A failing image is recorded in `failures` and does not stop the others.
pub async fn curate_images(
    registries: &HashMap<RegistryKind, Arc<dyn Registry>>,
    images: &[ImageRef],
    policy: &CurationPolicy,
) -> CurationReport {
    let futures = images.iter().enumerate().map(|(i, image)| {
        let delay = policy.stagger_delay * i as u32;
        async move {
            sleep(delay).await;
            let result = match registries.get(image.registry()) {
                Some(registry) => curate_image(registry.as_ref(), image, policy).await,
                None => Err(CurateError::NoRegistry(image.registry().clone())),
            };
            (image, result)
        }
    });

    let mut report = CurationReport::new(Utc::now());

    for (image, result) in join_all(futures).await {
        let key = image.to_string();
        match result {
            Ok(image_report) => {
                report.images.insert(key, image_report);
            }
            Err(CurateError::Registry(e @ RegistryError::RateLimited { .. })) => {
                warn!("Rate limited while curating {}: {}", key, e);
                report.failures.insert(key, e.to_string());
            }
            Err(e) => {
                error!("Failed to curate {}: {}", key, e);
                report.failures.insert(key, e.to_string());
            }
        }
    }

    report
}
