//! HTTP client for the Open Food Facts API.
//!
//! One GET per call against a base origin fixed at construction. No retries,
//! no caching, no rate limiting.

use std::fmt::Display;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::types::{ApiConfig, Error, Result};

/// Longest slice of an error body carried into an error message.
const BODY_SNIPPET_CHARS: usize = 200;

/// Ordered query string parameters. Absent optionals are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter using the value's `Display` form.
    pub fn push(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a parameter only when a value was supplied.
    pub fn push_opt<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Open Food Facts API client.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    http: Client,
    base_url: Url,
}

impl OpenFoodFactsClient {
    /// Create a client for the configured origin.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::invalid_argument(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::invalid_argument(format!(
                "Base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base origin. Each segment is
    /// percent-encoded on its own, so user input cannot add path levels.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::internal("Base URL cannot carry a path"))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// Issue one GET and parse the body as JSON. Any non-2xx status is a
    /// `NetworkError` carrying that status.
    pub async fn get(&self, segments: &[&str], query: &QueryParams) -> Result<Value> {
        let (url, status, body) = self.send(segments, query).await?;
        if !status.is_success() {
            return Err(http_error(&url, status, &body));
        }
        parse_json(&url, status, &body)
    }

    /// Issue one GET and return the status with the parsed body, including
    /// non-2xx replies that still carry JSON. A non-2xx reply with a non-JSON
    /// body is a `NetworkError`.
    pub async fn get_with_status(
        &self,
        segments: &[&str],
        query: &QueryParams,
    ) -> Result<(StatusCode, Value)> {
        let (url, status, body) = self.send(segments, query).await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok((status, value)),
            Err(_) if !status.is_success() => Err(http_error(&url, status, &body)),
            Err(_) => parse_json(&url, status, &body).map(|value| (status, value)),
        }
    }

    async fn send(&self, segments: &[&str], query: &QueryParams) -> Result<(Url, StatusCode, String)> {
        let url = self.endpoint(segments)?;
        tracing::debug!(url = %url, query = ?query.pairs(), "Open Food Facts request");

        let response = self
            .http
            .get(url.clone())
            .query(&query.pairs)
            .send()
            .await
            .map_err(|e| {
                Error::network(
                    format!("GET {} failed: {}", url, e),
                    e.status().map(|s| s.as_u16()),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "Open Food Facts error status");
        }
        let body = response.text().await.map_err(|e| {
            Error::network(
                format!("Failed to read response from {}: {}", url, e),
                Some(status.as_u16()),
            )
        })?;
        Ok((url, status, body))
    }
}

/// Error for a non-2xx reply, quoting the start of its body.
fn http_error(url: &Url, status: StatusCode, body: &str) -> Error {
    Error::network(
        format!(
            "GET {} returned HTTP {}: {}",
            url,
            status.as_u16(),
            snippet(body)
        ),
        Some(status.as_u16()),
    )
}

fn parse_json(url: &Url, status: StatusCode, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| {
        Error::network(
            format!(
                "GET {} returned a non-JSON body ({}): {}",
                url,
                e,
                snippet(body)
            ),
            Some(status.as_u16()),
        )
    })
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> OpenFoodFactsClient {
        OpenFoodFactsClient::new(&ApiConfig {
            base_url: base.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_query_params_skip_absent() {
        let mut query = QueryParams::new();
        query
            .push("json", 1)
            .push_opt("nutriment_fat_100g_max", None::<f64>)
            .push_opt("nutriment_proteins_100g_min", Some(10.5));

        assert_eq!(query.get("json"), Some("1"));
        assert_eq!(query.get("nutriment_fat_100g_max"), None);
        assert_eq!(query.get("nutriment_proteins_100g_min"), Some("10.5"));
        assert_eq!(query.pairs().len(), 2);
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("https://world.openfoodfacts.org");
        let url = c.endpoint(&["api", "v0", "product", "3017620422003.json"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/api/v0/product/3017620422003.json"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let c = client("http://127.0.0.1:8080/off/");
        let url = c.endpoint(&["search.json"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/off/search.json");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let c = client("https://world.openfoodfacts.org");
        let url = c.endpoint(&["brand", "ben & jerry/s.json"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/brand/ben%20&%20jerry%2Fs.json"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = OpenFoodFactsClient::new(&ApiConfig {
            base_url: "not a url".into(),
            ..ApiConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = OpenFoodFactsClient::new(&ApiConfig {
            base_url: "mailto:someone@example.com".into(),
            ..ApiConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let long = "é".repeat(500);
        let s = snippet(&long);
        assert_eq!(s.chars().count(), BODY_SNIPPET_CHARS + 1);
        assert_eq!(snippet("  short  "), "short");
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // port 9 (discard) is not listening on loopback in test environments
        let c = client("http://127.0.0.1:9");
        let err = c.get(&["search.json"], &QueryParams::new()).await.unwrap_err();
        assert!(matches!(err, Error::Network { status: None, .. }));
    }
}
