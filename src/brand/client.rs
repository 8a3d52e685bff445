//! Brand resolver trait and the Brandfetch search client

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::types::{BrandCandidate, ResolverError, parse_candidates};
use crate::id::normalize_name;

/// Brandfetch API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.brandfetch.io";

/// Environment variable holding the Brandfetch client id
pub const DEFAULT_CLIENT_ID_ENV: &str = "BRANDFETCH_CLIENT_ID";

/// Looks up brands by free-text name
#[async_trait]
pub trait BrandResolver: Send + Sync {
    /// Ranked candidates for `name`. A blank name yields no call and no results.
    async fn search(&self, name: &str) -> Result<Vec<BrandCandidate>, ResolverError>;
}

/// Configuration for the Brandfetch client
#[derive(Debug, Clone)]
pub struct BrandfetchConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    pub client_id_env: String,
    pub timeout: Duration,
}

impl Default for BrandfetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: None,
            client_id_env: DEFAULT_CLIENT_ID_ENV.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl BrandfetchConfig {
    /// Fill in the client id from the configured environment variable
    pub fn with_env_client_id(mut self) -> Self {
        self.client_id = std::env::var(&self.client_id_env).ok().filter(|v| !v.trim().is_empty());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Brandfetch search API client
pub struct BrandfetchClient {
    client: Client,
    config: BrandfetchConfig,
}

impl BrandfetchClient {
    pub fn new(config: BrandfetchConfig) -> Result<Self, ResolverError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// `{base}/v2/search/{name}?c={client_id}` with the name percent-encoded
    pub fn search_url(&self, name: &str) -> Result<Url, ResolverError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ResolverError::MissingClientId {
                env_var: self.config.client_id_env.clone(),
            })?;

        let mut url = Url::parse(&self.config.base_url).map_err(|e| ResolverError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ResolverError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(["v2", "search", name.trim()]);
        url.query_pairs_mut().append_pair("c", client_id);
        Ok(url)
    }

    pub fn is_ready(&self) -> bool {
        self.config.client_id.as_deref().is_some_and(|c| !c.is_empty())
    }
}

#[async_trait]
impl BrandResolver for BrandfetchClient {
    async fn search(&self, name: &str) -> Result<Vec<BrandCandidate>, ResolverError> {
        if name.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = self.search_url(name)?;
        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = status.as_u16(), query = %name.trim(), "Brand search failed");
            return Err(ResolverError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let candidates = parse_candidates(&body)?;
        tracing::debug!(query = %name.trim(), results = candidates.len(), "Brand search complete");
        Ok(candidates)
    }
}

impl std::fmt::Debug for BrandfetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrandfetchClient")
            .field("base_url", &self.config.base_url)
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// In-memory resolver with canned responses; records every query it receives
#[derive(Debug, Default)]
pub struct MockBrandResolver {
    responses: HashMap<String, Vec<BrandCandidate>>,
    failures: HashMap<String, (u16, String)>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl MockBrandResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, query: &str, candidates: Vec<BrandCandidate>) -> Self {
        self.responses.insert(normalize_name(query), candidates);
        self
    }

    pub fn with_failure(mut self, query: &str, status: u16, message: &str) -> Self {
        self.failures
            .insert(normalize_name(query), (status, message.to_string()));
        self
    }

    /// Simulated latency before each response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl BrandResolver for MockBrandResolver {
    async fn search(&self, name: &str) -> Result<Vec<BrandCandidate>, ResolverError> {
        let query = name.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.to_string());
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let key = normalize_name(query);
        if let Some((status, message)) = self.failures.get(&key) {
            return Err(ResolverError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self.responses.get(&key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BrandfetchClient {
        BrandfetchClient::new(BrandfetchConfig::default().with_client_id("test-client")).unwrap()
    }

    fn candidate(name: &str, domain: &str) -> BrandCandidate {
        BrandCandidate {
            name: Some(name.to_string()),
            domain: domain.to_string(),
            icon: None,
            claimed: true,
            brand_id: format!("id-{}", domain),
        }
    }

    #[test]
    fn test_config_default() {
        let config = BrandfetchConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client_id_env, DEFAULT_CLIENT_ID_ENV);
        assert!(config.client_id.is_none());
    }

    #[test]
    fn test_search_url_encodes_name() {
        let url = client().search_url("  Hugging Face ").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.brandfetch.io/v2/search/Hugging%20Face?c=test-client"
        );
    }

    #[test]
    fn test_search_url_escapes_slashes() {
        let url = client().search_url("a/b").unwrap();
        assert!(url.as_str().contains("/v2/search/a%2Fb?"));
    }

    #[test]
    fn test_search_url_custom_base() {
        let client = BrandfetchClient::new(
            BrandfetchConfig::default()
                .with_client_id("c")
                .with_base_url("http://localhost:8080/"),
        )
        .unwrap();
        let url = client.search_url("react").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v2/search/react?c=c");
    }

    #[test]
    fn test_search_url_requires_client_id() {
        let client = BrandfetchClient::new(BrandfetchConfig::default()).unwrap();
        assert!(!client.is_ready());
        let err = client.search_url("react").unwrap_err();
        assert!(matches!(err, ResolverError::MissingClientId { .. }));
    }

    #[tokio::test]
    async fn test_blank_search_issues_no_call() {
        // No client id: a real call would fail, so an Ok here proves no call was made
        let client = BrandfetchClient::new(BrandfetchConfig::default()).unwrap();
        assert!(client.search("   ").await.unwrap().is_empty());
    }

    #[test]
    fn test_debug_hides_client_id() {
        let debug_str = format!("{:?}", client());
        assert!(debug_str.contains("BrandfetchClient"));
        assert!(!debug_str.contains("test-client"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BrandfetchClient>();
        assert_send_sync::<MockBrandResolver>();
    }

    #[tokio::test]
    async fn test_mock_returns_canned_response() {
        let mock = MockBrandResolver::new().with_response("Supabase", vec![candidate("Supabase", "supabase.com")]);

        let results = mock.search(" supabase ").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].domain, "supabase.com");
        assert!(mock.search("unknown").await.unwrap().is_empty());
        assert_eq!(mock.calls(), vec!["supabase", "unknown"]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockBrandResolver::new().with_failure("down", 502, "bad gateway");
        let err = mock.search("down").await.unwrap_err();
        assert!(matches!(err, ResolverError::Api { status: 502, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_mock_blank_query_not_recorded() {
        let mock = MockBrandResolver::new();
        mock.search("  ").await.unwrap();
        assert_eq!(mock.call_count(), 0);
    }
}
