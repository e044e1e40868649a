//! Registry test utilities

use std::collections::HashMap;

use async_trait::async_trait;

use tag_curator::version::error::RegistryError;
use tag_curator::version::registry::Registry;
use tag_curator::version::semver::{TagVersion, parse_tag};
use tag_curator::version::types::{ImageRef, ImageTags, RegistryKind};

/// Mock registry for testing
pub struct MockRegistry {
    kind: RegistryKind,
    tags: HashMap<String, Vec<String>>,
}

impl MockRegistry {
    pub fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            tags: HashMap::new(),
        }
    }

    /// Register tags for an image repository (e.g. `library/nginx`)
    pub fn with_tags(mut self, repository: &str, tags: &[&str]) -> Self {
        self.tags.insert(
            repository.to_string(),
            tags.iter().map(|t| t.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl Registry for MockRegistry {
    fn kind(&self) -> RegistryKind {
        self.kind.clone()
    }

    async fn fetch_tags(&self, image: &ImageRef) -> Result<ImageTags, RegistryError> {
        match self.tags.get(image.repository()) {
            Some(tags) => Ok(ImageTags::new(tags.clone())),
            None => Err(RegistryError::NotFound(image.to_string())),
        }
    }
}

/// Parse tags that are known to be valid
pub fn parse_tags(tags: &[&str]) -> Vec<TagVersion> {
    tags.iter().map(|t| parse_tag(t).unwrap()).collect()
}
