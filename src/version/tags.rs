//! Separates semver tags from the rest of an image's tag list

use tracing::debug;

use crate::version::semver::{TagVersion, parse_tag};

/// Tags of an image after parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiscovery {
    /// Tags that parsed as semantic versions, in input order
    pub versions: Vec<TagVersion>,
    /// Tags that are not semantic versions (`latest`, `alpine`, ...)
    pub skipped: Vec<String>,
}

/// Parse every tag, keeping the ones that are semantic versions
pub fn discover_versions<S: AsRef<str>>(tags: &[S]) -> TagDiscovery {
    let mut discovery = TagDiscovery::default();

    for tag in tags {
        let tag = tag.as_ref();
        match parse_tag(tag) {
            Ok(version) => discovery.versions.push(version),
            Err(e) => {
                debug!("Skipping tag {:?}: {}", tag, e);
                discovery.skipped.push(tag.to_string());
            }
        }
    }

    discovery
}
