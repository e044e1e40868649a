//! Docker Hub repositories API registry implementation

use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::error::RegistryError;
use crate::version::registry::{DEFAULT_MAX_PAGES, Registry, status_error};
use crate::version::types::{ImageRef, ImageTags, RegistryKind};

/// Default base URL for Docker Hub API
const DEFAULT_BASE_URL: &str = "https://hub.docker.com";

/// Tags requested per page (Docker Hub maximum)
const PAGE_SIZE: usize = 100;

/// Response page from Docker Hub tags API
#[derive(Debug, Deserialize)]
struct TagsPage {
    next: Option<String>,
    results: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Registry implementation for the Docker Hub repositories API
pub struct DockerHubRegistry {
    client: reqwest::Client,
    base_url: String,
    max_pages: usize,
}

impl DockerHubRegistry {
    /// Creates a new DockerHubRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("tag-curator")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Default for DockerHubRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for DockerHubRegistry {
    fn kind(&self) -> RegistryKind {
        RegistryKind::DockerHub
    }

    async fn fetch_tags(&self, image: &ImageRef) -> Result<ImageTags, RegistryError> {
        let mut url = format!(
            "{}/v2/repositories/{}/tags?page_size={}",
            self.base_url,
            image.repository(),
            PAGE_SIZE
        );
        let mut tags = Vec::new();

        for page in 1..=self.max_pages {
            debug!("Fetching Docker Hub tags page {} for {}", page, image);

            let response = self.client.get(&url).send().await?;

            if let Some(error) = status_error(&response, image) {
                warn!("Docker Hub returned status {}: {}", response.status(), url);
                return Err(error);
            }

            let body: TagsPage = response.json().await.map_err(|e| {
                warn!("Failed to parse Docker Hub tags response: {}", e);
                RegistryError::InvalidResponse(e.to_string())
            })?;

            tags.extend(body.results.into_iter().map(|entry| entry.name));

            match body.next {
                Some(next) => url = next,
                None => return Ok(ImageTags::new(tags)),
            }
        }

        Err(RegistryError::InvalidResponse(format!(
            "More than {} pages of tags for {}",
            self.max_pages, image
        )))
    }
}
