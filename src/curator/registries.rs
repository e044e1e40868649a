//! Builds the registry clients a curation run needs

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::{CuratorConfig, OciConfig};
use crate::version::registries::{DockerHubRegistry, OciRegistry};
use crate::version::registry::Registry;
use crate::version::types::{ImageRef, RegistryKind};

/// Create one registry per kind: Docker Hub, every configured OCI host,
/// and every OCI host referenced by `images`
pub fn create_registries(
    config: &CuratorConfig,
    images: &[ImageRef],
) -> HashMap<RegistryKind, Arc<dyn Registry>> {
    let mut registries: HashMap<RegistryKind, Arc<dyn Registry>> = HashMap::new();
    let max_pages = config.fetch.max_pages;

    registries.insert(
        RegistryKind::DockerHub,
        Arc::new(
            DockerHubRegistry::new(&config.registries.docker_hub.base_url).with_max_pages(max_pages),
        ),
    );

    let referenced_hosts = images.iter().filter_map(|image| match image.registry() {
        RegistryKind::Oci(host) => Some(host.as_str()),
        RegistryKind::DockerHub => None,
    });
    let hosts = config
        .registries
        .oci
        .keys()
        .map(String::as_str)
        .chain(referenced_hosts);

    let default_oci = OciConfig::default();
    for host in hosts {
        let kind = RegistryKind::Oci(host.to_string());
        if registries.contains_key(&kind) {
            continue;
        }

        let oci = config.registries.oci.get(host).unwrap_or(&default_oci);
        let registry = match &oci.base_url {
            Some(base_url) => OciRegistry::new(host, base_url),
            None => OciRegistry::for_host(host),
        };
        debug!("Registered OCI registry for {}", host);

        registries.insert(
            kind,
            Arc::new(registry.with_token(oci.token()).with_max_pages(max_pages)),
        );
    }

    registries
}
