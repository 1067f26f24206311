//! Ansible Galaxy search API registry implementation

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_GALAXY_URL, FETCH_TIMEOUT_MS, USER_AGENT};
use crate::parser::types::Role;
use crate::version::error::FetchError;
use crate::version::registry::Registry;
use crate::version::types::PackageVersions;

/// Path of the role search endpoint, relative to the Galaxy base URL
const SEARCH_PATH: &str = "/api/v1/search/roles/";

/// Response from the Galaxy role search API
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    summary_fields: SummaryFields,
}

#[derive(Debug, Deserialize)]
struct SummaryFields {
    namespace: NamespaceSummary,
    #[serde(default)]
    versions: Vec<VersionSummary>,
}

#[derive(Debug, Deserialize)]
struct NamespaceSummary {
    name: String,
}

#[derive(Debug, Deserialize)]
struct VersionSummary {
    name: String,
}

/// Search parameters derived from a role declaration
#[derive(Debug, PartialEq, Eq)]
struct SearchQuery<'a> {
    keywords: &'a str,
    namespace: Option<&'a str>,
    name: &'a str,
}

impl<'a> SearchQuery<'a> {
    /// `geerlingguy.docker` searches for role `docker` in namespace `geerlingguy`
    fn from_role(role: &'a Role) -> Self {
        let keywords = role.location();
        match keywords.split_once('.') {
            Some((namespace, name)) => Self {
                keywords,
                namespace: Some(namespace),
                name,
            },
            None => Self {
                keywords,
                namespace: None,
                name: keywords,
            },
        }
    }

    fn params(&self) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("order_by", "-relevance"), ("keywords", self.keywords)];
        if let Some(namespace) = self.namespace {
            params.push(("namespaces", namespace));
        }
        params
    }

    /// Relevance search also returns near-matches, only an exact hit counts
    fn matches(&self, result: &SearchResult) -> bool {
        result.name == self.name
            && self
                .namespace
                .is_none_or(|ns| result.summary_fields.namespace.name == ns)
    }
}

/// Registry implementation for the Ansible Galaxy role search API
pub struct GalaxyRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl GalaxyRegistry {
    /// Creates a new GalaxyRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_millis(FETCH_TIMEOUT_MS))
    }

    /// Creates a new GalaxyRegistry whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn search(&self, url: reqwest::Url) -> Result<SearchResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Galaxy API returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse(format!(
                "unexpected Galaxy response code: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Galaxy search timed out: {}", e);
                return FetchError::from(e);
            }
            warn!("Failed to parse Galaxy search response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })
    }
}

impl Default for GalaxyRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_GALAXY_URL)
    }
}

#[async_trait::async_trait]
impl Registry for GalaxyRegistry {
    async fn fetch_all_versions(
        &self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> Result<PackageVersions, FetchError> {
        let query = SearchQuery::from_role(role);
        if query.keywords.is_empty() {
            return Err(FetchError::NotFound(role.display_name().to_string()));
        }

        let endpoint = format!("{}{}", self.base_url, SEARCH_PATH);
        let url = reqwest::Url::parse_with_params(&endpoint, query.params())
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        debug!("Searching Galaxy: {}", url);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            response = self.search(url) => response?,
        };

        let Some(result) = response
            .results
            .into_iter()
            .next()
            .filter(|first| query.matches(first))
        else {
            return Err(FetchError::NotFound(query.keywords.to_string()));
        };

        let versions: PackageVersions = result
            .summary_fields
            .versions
            .into_iter()
            .map(|v| v.name)
            .collect();
        info!("Found {} versions for {} on Galaxy", versions.len(), query.keywords);

        Ok(versions)
    }
}
