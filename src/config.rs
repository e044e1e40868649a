use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::version::outlier::DEFAULT_MIN_MAJOR_GAP;
use crate::version::registry::DEFAULT_MAX_PAGES;
use crate::version::types::ImageRef;

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for fetching all tags of one image in milliseconds (30 seconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// Delay between starting each fetch request to avoid rate limiting (10ms)
pub const DEFAULT_FETCH_STAGGER_DELAY_MS: u64 = 10;

/// Default Docker Hub API endpoint
pub const DEFAULT_DOCKER_HUB_URL: &str = "https://hub.docker.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid config {path:?}: {key} must be at least 1")]
    Invalid { path: PathBuf, key: &'static str },
}

/// Curator configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CuratorConfig {
    /// Images checked when none are given on the command line
    pub images: Vec<ImageRef>,
    pub outliers: OutlierConfig,
    pub fetch: FetchConfig,
    pub registries: RegistriesConfig,
}

impl CuratorConfig {
    /// First setting that is zero but has to be positive
    fn zero_setting(&self) -> Option<&'static str> {
        [
            ("outliers.minMajorGap", self.outliers.min_major_gap),
            ("fetch.timeoutMs", self.fetch.timeout_ms),
            ("fetch.maxPages", self.fetch.max_pages as u64),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0)
        .map(|(key, _)| key)
    }
}

/// Outlier detection configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlierConfig {
    /// Major-version jump between neighbouring tags that starts the outlier region
    pub min_major_gap: u64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            min_major_gap: DEFAULT_MIN_MAJOR_GAP,
        }
    }
}

/// Fetch-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// Per-image timeout in milliseconds
    pub timeout_ms: u64,
    /// Delay between the start of consecutive image fetches in milliseconds
    pub stagger_delay_ms: u64,
    /// Pagination limit per image
    pub max_pages: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            stagger_delay_ms: DEFAULT_FETCH_STAGGER_DELAY_MS,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Registry-specific configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistriesConfig {
    pub docker_hub: DockerHubConfig,
    /// OCI registries keyed by host (`ghcr.io`, `localhost:5000`, ...)
    pub oci: HashMap<String, OciConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DockerHubConfig {
    pub base_url: String,
}

impl Default for DockerHubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DOCKER_HUB_URL.to_string(),
        }
    }
}

/// Individual OCI registry configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OciConfig {
    /// Overrides `https://<host>`
    pub base_url: Option<String>,
    /// Name of the environment variable holding a bearer token
    pub token_env: Option<String>,
}

impl OciConfig {
    pub fn token(&self) -> Option<String> {
        self.token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|token| !token.is_empty())
    }
}

/// Load configuration from `path`, falling back to defaults when the file does not exist
pub fn load_config(path: &Path) -> Result<CuratorConfig, ConfigError> {
    if !path.exists() {
        debug!("No config at {:?}, using defaults", path);
        return Ok(CuratorConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: CuratorConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(key) = config.zero_setting() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            key,
        });
    }

    info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Returns the path to the default config file.
/// Uses $XDG_CONFIG_HOME/tag-curator/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/tag-curator/config.json.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir()).join("config.json")
}

/// Returns the path to the data directory for tag-curator.
/// Uses $XDG_DATA_HOME/tag-curator if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/tag-curator,
/// or ./tag-curator if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("tag-curator.log")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    xdg_dir_with_env(xdg_config_home, home_dir, ".config")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    xdg_dir_with_env(xdg_data_home, home_dir, ".local/share")
}

fn xdg_dir_with_env(xdg_home: Option<String>, home_dir: Option<PathBuf>, fallback: &str) -> PathBuf {
    let base = xdg_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(fallback)))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("tag-curator")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn curator_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<CuratorConfig>(json!({
            "outliers": {
                "minMajorGap": 5
            }
        }))
        .unwrap();

        assert_eq!(result.outliers.min_major_gap, 5);
        assert_eq!(result.fetch, FetchConfig::default());
        assert_eq!(result.registries, RegistriesConfig::default());
        assert!(result.images.is_empty());
    }

    #[test]
    fn curator_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<CuratorConfig>(json!({
            "images": ["nginx", "ghcr.io/org/app"],
            "outliers": { "minMajorGap": 4 },
            "fetch": { "timeoutMs": 1000, "staggerDelayMs": 0, "maxPages": 3 },
            "registries": {
                "dockerHub": { "baseUrl": "http://localhost:8080" },
                "oci": {
                    "ghcr.io": { "tokenEnv": "GHCR_TOKEN" }
                }
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            CuratorConfig {
                images: vec![
                    ImageRef::parse("nginx").unwrap(),
                    ImageRef::parse("ghcr.io/org/app").unwrap(),
                ],
                outliers: OutlierConfig { min_major_gap: 4 },
                fetch: FetchConfig {
                    timeout_ms: 1000,
                    stagger_delay_ms: 0,
                    max_pages: 3,
                },
                registries: RegistriesConfig {
                    docker_hub: DockerHubConfig {
                        base_url: "http://localhost:8080".to_string(),
                    },
                    oci: HashMap::from([(
                        "ghcr.io".to_string(),
                        OciConfig {
                            base_url: None,
                            token_env: Some("GHCR_TOKEN".to_string()),
                        },
                    )]),
                },
            }
        );
    }

    #[test]
    fn curator_config_rejects_invalid_image_reference() {
        let result = serde_json::from_value::<CuratorConfig>(json!({
            "images": ["nginx:latest"]
        }));

        assert!(result.is_err());
    }

    #[test]
    fn load_config_returns_defaults_when_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();

        let config = load_config(&temp_dir.path().join("config.json")).unwrap();

        assert_eq!(config, CuratorConfig::default());
    }

    #[test]
    fn load_config_reads_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"images": ["bitnami/redis"]}"#).unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.images, vec![ImageRef::parse("bitnami/redis").unwrap()]);
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[rstest]
    #[case(r#"{"outliers": {"minMajorGap": 0}}"#, "outliers.minMajorGap")]
    #[case(r#"{"fetch": {"timeoutMs": 0}}"#, "fetch.timeoutMs")]
    #[case(r#"{"fetch": {"maxPages": 0}}"#, "fetch.maxPages")]
    fn load_config_rejects_zero_limits(#[case] content: &str, #[case] expected_key: &str) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, content).unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Invalid { key, .. }) if key == expected_key));
    }

    #[test]
    fn load_config_accepts_zero_stagger_delay() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"fetch": {"staggerDelayMs": 0}}"#).unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.fetch.stagger_delay_ms, 0);
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/tag-curator"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/tag-curator"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./tag-curator"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_home_config() {
        let path = config_dir_with_env(Some(String::new()), Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.config/tag-curator"));
    }
}
