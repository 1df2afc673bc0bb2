use crate::core::{ConfigProvider, JsonSource};
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{validate_required_field, validate_url};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;

/// Backend base URL, validated and stored without trailing slashes so that
/// joining `/` never produces `//`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        validate_url("api.base_url", trimmed)?;
        Ok(Self(trimmed.trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `endpoint("/")` is exactly `{base}/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: BaseUrl,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let configured = config.api_base_url();
        let raw = validate_required_field("api.base_url", &configured)?;
        Ok(Self::new(BaseUrl::parse(raw)?))
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }
}

#[async_trait]
impl JsonSource for ApiClient {
    fn url_for(&self, path: &str) -> String {
        self.base_url.endpoint(path)
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let url = self.url_for(path);

        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            tracing::warn!(%url, %status, "backend returned a non-success status");
            return Err(ApiError::FetchFailed { status });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FETCH_FAILED_MESSAGE;
    use httpmock::prelude::*;

    struct StaticConfig(Option<String>);

    impl ConfigProvider for StaticConfig {
        fn api_base_url(&self) -> Option<&str> {
            self.0.as_deref()
        }
    }

    #[test]
    fn test_base_url_strips_trailing_slashes() {
        let base = BaseUrl::parse("http://localhost:8000//").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8000");
        assert_eq!(base.endpoint("/"), "http://localhost:8000/");
        assert_eq!(base.endpoint("health"), "http://localhost:8000/health");
        assert_eq!(base.endpoint("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let base = BaseUrl::parse("https://example.com/api/").unwrap();
        assert_eq!(base.endpoint("/"), "https://example.com/api/");
    }

    #[test]
    fn test_base_url_rejects_empty_and_foreign_schemes() {
        assert!(BaseUrl::parse("").is_err());
        assert!(BaseUrl::parse("   ").is_err());
        assert!(BaseUrl::parse("ftp://example.com").is_err());
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let err = ApiClient::from_config(&StaticConfig(None)).unwrap_err();
        assert!(matches!(err, ApiError::MissingConfigError { .. }));

        let client =
            ApiClient::from_config(&StaticConfig(Some("http://localhost:8000/".into()))).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_get_json_returns_parsed_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"ok": true}));
        });

        let client = ApiClient::new(BaseUrl::parse(&server.base_url()).unwrap());
        let body = client.get_json("/").await.unwrap();

        api_mock.assert();
        assert_eq!(body, serde_json::json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_get_json_non_success_is_fetch_failed() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(500);
        });

        let client = ApiClient::new(BaseUrl::parse(&server.base_url()).unwrap());
        let err = client.get_json("/").await.unwrap_err();

        api_mock.assert();
        match err {
            ApiError::FetchFailed { status } => assert_eq!(status.as_u16(), 500),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_json_client_error_uses_same_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(404);
        });

        let client = ApiClient::new(BaseUrl::parse(&server.base_url()).unwrap());
        let err = client.get_json("/").await.unwrap_err();

        assert_eq!(err.to_string(), FETCH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_get_json_invalid_body_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("not json");
        });

        let client = ApiClient::new(BaseUrl::parse(&server.base_url()).unwrap());
        let err = client.get_json("/").await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_trailing_slash_base_url_requests_single_slash() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).json_body(serde_json::json!({"ok": true}));
        });

        let raw = format!("{}/", server.base_url());
        let client = ApiClient::new(BaseUrl::parse(&raw).unwrap());
        client.get_json("/").await.unwrap();

        api_mock.assert_hits(1);
    }
}
