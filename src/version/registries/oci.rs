//! OCI distribution API (`/v2/<name>/tags/list`) registry implementation

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::error::RegistryError;
use crate::version::registry::{DEFAULT_MAX_PAGES, Registry, status_error};
use crate::version::types::{ImageRef, ImageTags, RegistryKind};

/// Tags requested per page
const PAGE_SIZE: usize = 1000;

/// `<url>; rel="next"` entry of an RFC 5988 Link header
static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>\s*;\s*rel="?next"?"#).expect("link pattern is valid")
});

/// `key="value"` parameter of a `WWW-Authenticate` challenge
static CHALLENGE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)="([^"]*)""#).expect("challenge pattern is valid")
});

/// Response from the tags list endpoint
#[derive(Debug, Deserialize)]
struct TagList {
    // Registries answer `null` for repositories without tags
    tags: Option<Vec<String>>,
}

/// Response from a token service
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    access_token: Option<String>,
}

/// `Bearer realm=...,service=...,scope=...` challenge of a 401 response
#[derive(Debug, PartialEq, Eq)]
struct BearerChallenge {
    realm: String,
    service: Option<String>,
    scope: Option<String>,
}

impl BearerChallenge {
    fn from_response(response: &reqwest::Response) -> Option<Self> {
        let header = response.headers().get("www-authenticate")?.to_str().ok()?;
        Self::parse(header)
    }

    fn parse(header: &str) -> Option<Self> {
        let (scheme, params) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }

        let mut realm = None;
        let mut service = None;
        let mut scope = None;
        for captures in CHALLENGE_PARAM.captures_iter(params) {
            let value = captures[2].to_string();
            match &captures[1] {
                "realm" => realm = Some(value),
                "service" => service = Some(value),
                "scope" => scope = Some(value),
                _ => {}
            }
        }

        Some(Self {
            realm: realm?,
            service,
            scope,
        })
    }

    /// Token endpoint URL; pull scope on `image` unless the challenge names one
    fn token_url(&self, image: &ImageRef) -> String {
        let scope = self
            .scope
            .clone()
            .unwrap_or_else(|| format!("repository:{}:pull", image.repository()));
        let separator = if self.realm.contains('?') { '&' } else { '?' };

        match &self.service {
            Some(service) => format!("{}{}service={}&scope={}", self.realm, separator, service, scope),
            None => format!("{}{}scope={}", self.realm, separator, scope),
        }
    }
}

/// Registry implementation for OCI distribution registries (ghcr.io, quay.io, ...)
///
/// Without a configured token, a `401` carrying a bearer challenge is
/// answered by fetching an anonymous pull token from the challenge realm.
pub struct OciRegistry {
    client: reqwest::Client,
    host: String,
    base_url: String,
    token: Option<String>,
    max_pages: usize,
}

impl OciRegistry {
    /// Creates a new OciRegistry for `host`, reachable at `base_url`
    pub fn new(host: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("tag-curator")
                .build()
                .expect("Failed to create HTTP client"),
            host: host.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Creates a registry for `host` served over HTTPS
    pub fn for_host(host: &str) -> Self {
        Self::new(host, &format!("https://{}", host))
    }

    /// Sends `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    async fn get(&self, url: &str, token: Option<&str>) -> Result<reqwest::Response, RegistryError> {
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    async fn anonymous_token(
        &self,
        challenge: &BearerChallenge,
        image: &ImageRef,
    ) -> Result<String, RegistryError> {
        let url = challenge.token_url(image);
        debug!("Requesting anonymous token for {}: {}", image, url);

        let response = self.client.get(&url).send().await?;
        if let Some(error) = status_error(&response, image) {
            warn!("Token service returned status {}: {}", response.status(), url);
            return Err(error);
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse token response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        body.token
            .or(body.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| RegistryError::Unauthorized(image.to_string()))
    }

    /// Resolve the `next` link of a response, which is usually relative to the registry root
    fn next_url(&self, response: &reqwest::Response) -> Option<String> {
        let link = response.headers().get("link")?.to_str().ok()?;
        let target = NEXT_LINK.captures(link)?.get(1)?.as_str();

        if target.starts_with("http://") || target.starts_with("https://") {
            Some(target.to_string())
        } else {
            Some(format!("{}/{}", self.base_url, target.trim_start_matches('/')))
        }
    }
}

#[async_trait::async_trait]
impl Registry for OciRegistry {
    fn kind(&self) -> RegistryKind {
        RegistryKind::Oci(self.host.clone())
    }

    async fn fetch_tags(&self, image: &ImageRef) -> Result<ImageTags, RegistryError> {
        let mut url = format!(
            "{}/v2/{}/tags/list?n={}",
            self.base_url,
            image.repository(),
            PAGE_SIZE
        );
        let mut tags = Vec::new();
        let mut token = self.token.clone();

        for page in 1..=self.max_pages {
            debug!("Fetching OCI tags page {} for {}", page, image);

            let mut response = self.get(&url, token.as_deref()).await?;

            if response.status() == reqwest::StatusCode::UNAUTHORIZED && token.is_none() {
                if let Some(challenge) = BearerChallenge::from_response(&response) {
                    let anonymous = self.anonymous_token(&challenge, image).await?;
                    response = self.get(&url, Some(anonymous.as_str())).await?;
                    token = Some(anonymous);
                }
            }

            if let Some(error) = status_error(&response, image) {
                warn!("Registry {} returned status {}: {}", self.host, response.status(), url);
                return Err(error);
            }

            let next = self.next_url(&response);

            let body: TagList = response.json().await.map_err(|e| {
                warn!("Failed to parse tags list response: {}", e);
                RegistryError::InvalidResponse(e.to_string())
            })?;

            tags.extend(body.tags.unwrap_or_default());

            match next {
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
