//! Registry trait for listing the tags of container images

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::{ImageRef, ImageTags, RegistryKind};

/// Upper bound on followed pagination links per image
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Trait for fetching image tags from a registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Returns the kind of registry this implementation handles
    fn kind(&self) -> RegistryKind;

    /// Fetches every tag of an image repository
    ///
    /// # Arguments
    /// * `image` - The image repository (e.g., `docker.io/library/nginx`)
    ///
    /// # Returns
    /// * `Ok(ImageTags)` - All tags, in the order the registry lists them
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_tags(&self, image: &ImageRef) -> Result<ImageTags, RegistryError>;
}

/// Map an unsuccessful HTTP status to a registry error
///
/// Returns `None` for successful responses.
pub(crate) fn status_error(
    response: &reqwest::Response,
    image: &ImageRef,
) -> Option<RegistryError> {
    let status = response.status();

    if status.is_success() {
        return None;
    }

    let error = match status {
        reqwest::StatusCode::NOT_FOUND => RegistryError::NotFound(image.to_string()),
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            RegistryError::Unauthorized(image.to_string())
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            RegistryError::RateLimited {
                retry_after_secs: retry_after,
            }
        }
        _ => RegistryError::InvalidResponse(format!("Unexpected status: {}", status)),
    };

    Some(error)
}
