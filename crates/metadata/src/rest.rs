//! Minimal JSON-over-HTTP client shared by provider clients.
//!
//! Providers configure it with a base URL and a query hook instead of
//! wrapping their own request plumbing.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::MetadataError;

/// Ordered query parameters with `URLSearchParams.set` semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_url(url: &Url) -> Self {
        Self(url.query_pairs().into_owned().collect())
    }

    /// Replace the first `key` in place and drop any later duplicates, or
    /// append when absent.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.0.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.0[first].1 = value.to_string();
                let mut index = 0;
                self.0.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.0.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn write_to(&self, url: &mut Url) {
        url.set_query(None);
        if !self.0.is_empty() {
            url.query_pairs_mut().extend_pairs(self.0.iter());
        }
    }
}

pub type QueryHook = Arc<dyn Fn(&mut QueryParams) + Send + Sync>;

/// Generic REST client: a base URL, a hook run over every outgoing query
/// string, and JSON-only responses.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base: Url,
    query_hook: Option<QueryHook>,
}

impl RestClient {
    pub fn new(base: &str) -> Result<Self, MetadataError> {
        // Relative endpoints resolve under the last path segment only with a trailing slash.
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&base).map_err(|e| MetadataError::Url(format!("{base}: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            query_hook: None,
        })
    }

    pub fn with_query_hook(
        mut self,
        hook: impl Fn(&mut QueryParams) + Send + Sync + 'static,
    ) -> Self {
        self.query_hook = Some(Arc::new(hook));
        self
    }

    /// GET `endpoint` with `params` merged over any query it already carries.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MetadataError> {
        let url = self.url_with(endpoint, params)?;
        // An absolute URL resolves to itself against the base.
        self.request(Method::GET, url.as_str()).await
    }

    /// Send `method` to `endpoint`, which is resolved against the base and
    /// may carry its own query string.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
    ) -> Result<T, MetadataError> {
        let url = self.resolve(endpoint)?;
        self.send(method, url).await
    }

    /// The URL `get` would call, before the query hook runs.
    pub fn url_with(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, MetadataError> {
        let mut url = self.resolve(endpoint)?;
        let mut query = QueryParams::from_url(&url);
        for (key, value) in params {
            query.set(key, value);
        }
        query.write_to(&mut url);
        Ok(url)
    }

    fn resolve(&self, endpoint: &str) -> Result<Url, MetadataError> {
        self.base
            .join(endpoint)
            .map_err(|e| MetadataError::Url(format!("{endpoint}: {e}")))
    }

    fn finalize(&self, mut url: Url) -> Url {
        if let Some(hook) = &self.query_hook {
            let mut query = QueryParams::from_url(&url);
            hook(&mut query);
            query.write_to(&mut url);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T, MetadataError> {
        let url = self.finalize(url);
        // The query carries the credential; log the path only.
        debug!(%method, path = url.path(), "REST request");

        let resp = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MetadataError::Status(
                status
                    .canonical_reason()
                    .unwrap_or_else(|| status.as_str())
                    .to_string(),
            ));
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        if !media_type.eq_ignore_ascii_case("application/json") {
            return Err(MetadataError::UnsupportedContentType(media_type.to_string()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| MetadataError::Decode(e.to_string()))
    }
}
