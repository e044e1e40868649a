//! Common types for images and their tags

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::version::error::ImageRefError;

/// Host name Docker Hub images resolve to when no registry is given
pub const DOCKER_HUB_HOST: &str = "docker.io";

const DOCKER_HUB_ALIASES: &[&str] = &[DOCKER_HUB_HOST, "index.docker.io", "registry-1.docker.io"];

/// Which kind of registry serves an image
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    /// Docker Hub (hub.docker.com repositories API)
    DockerHub,
    /// Any OCI distribution registry, keyed by host (ghcr.io, quay.io, ...)
    Oci(String),
}

impl RegistryKind {
    pub fn host(&self) -> &str {
        match self {
            RegistryKind::DockerHub => DOCKER_HUB_HOST,
            RegistryKind::Oci(host) => host,
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::DockerHub => f.write_str("docker_hub"),
            RegistryKind::Oci(host) => write!(f, "oci:{}", host),
        }
    }
}

/// Reference to a container image repository, without tag or digest
///
/// - `nginx` -> docker.io/library/nginx
/// - `bitnami/redis` -> docker.io/bitnami/redis
/// - `ghcr.io/org/app` -> ghcr.io/org/app
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct ImageRef {
    registry: RegistryKind,
    repository: String,
}

impl ImageRef {
    pub fn registry(&self) -> &RegistryKind {
        &self.registry
    }

    /// Repository path within the registry (e.g. `library/nginx`)
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn parse(reference: &str) -> Result<Self, ImageRefError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ImageRefError::Empty);
        }

        let invalid = || ImageRefError::Invalid(reference.to_string());

        if reference.contains('@') || reference.contains("://") {
            return Err(invalid());
        }

        let (host, path) = match reference.split_once('/') {
            Some((first, rest)) if is_registry_host(first) => (Some(first), rest),
            _ => (None, reference),
        };

        let components: Vec<&str> = path.split('/').collect();
        if components.iter().any(|c| !is_path_component(c)) {
            return Err(invalid());
        }

        let registry = match host {
            Some(host) if !DOCKER_HUB_ALIASES.contains(&host) => RegistryKind::Oci(host.to_string()),
            _ => RegistryKind::DockerHub,
        };

        let repository = if registry == RegistryKind::DockerHub && components.len() == 1 {
            format!("library/{}", path)
        } else {
            path.to_string()
        };

        Ok(Self {
            registry,
            repository,
        })
    }
}

/// First path segment names a registry when it looks like a host
fn is_registry_host(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment == "localhost"
}

fn is_path_component(component: &str) -> bool {
    !component.is_empty()
        && component
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}

impl FromStr for ImageRef {
    type Err = ImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ImageRef {
    type Error = ImageRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.registry.host(), self.repository)
    }
}

/// Raw tags of an image as returned by a registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTags {
    /// Tags in registry order
    pub tags: Vec<String>,
}

impl ImageTags {
    pub fn new(tags: Vec<String>) -> Self {
        Self { tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}
