//! Authenticated HTTP client for the Canvas REST and GraphQL APIs.

use std::time::Duration;

use reqwest::{Client, Method, Url, header};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::error::ApiError;
use super::pagination::{PageOptions, next_link};
use super::query::QueryParams;
use crate::core::config::CanvasConfig;

/// A decoded-on-demand Canvas response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub url: String,
    /// Raw `rel="next"` target from the `Link` header.
    pub next_page: Option<String>,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::decode(format!("{} (from {})", e, self.url)))
    }

    /// Body as JSON when it parses, otherwise as a JSON string.
    pub fn data(&self) -> serde_json::Value {
        if self.body.trim().is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }
}

/// Items collected by [`CanvasClient::get_paginated`].
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<serde_json::Value>,
    pub pages_fetched: usize,
    /// True when more records exist beyond what was collected.
    pub has_more: bool,
}

/// Canvas API client.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its pool.
#[derive(Clone)]
pub struct CanvasClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for CanvasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl CanvasClient {
    /// Build a client from configuration.
    ///
    /// A missing token is not an error here; every request fails with
    /// [`ApiError::MissingToken`] instead.
    pub fn new(config: &CanvasConfig) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("canvas-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: config.api_token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    /// API root, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path relative to the API root.
    ///
    /// Absolute URLs are rejected so the bearer token is only ever sent to
    /// the configured host.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let path = path.trim();
        if path.contains("://") || path.starts_with("//") {
            return Err(ApiError::invalid_url(format!(
                "path must be relative to {}, got {path}",
                self.base_url
            )));
        }
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::invalid_url(format!("{path}: {e}")))
    }

    /// GraphQL endpoint, a sibling of the REST root (`/api/v1/` -> `/api/graphql`).
    pub fn graphql_endpoint(&self) -> Result<Url, ApiError> {
        self.base_url
            .join("../graphql")
            .map_err(|e| ApiError::invalid_url(format!("graphql endpoint: {e}")))
    }

    /// Send one authenticated request and collect the response.
    #[instrument(skip_all, fields(method = %method, url = %url))]
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;

        debug!("Canvas request");
        let mut request = self
            .http
            .request(method, url.clone())
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let next_page = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_link);
        let text = response.text().await?;

        debug!(status = status.as_u16(), bytes = text.len(), "Canvas response");

        if !status.is_success() {
            warn!(status = status.as_u16(), "Canvas API error");
            return Err(ApiError::from_response(status.as_u16(), &text));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            url: url.to_string(),
            next_page,
            body: text,
        })
    }

    /// Request `path` with query parameters and an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse, ApiError> {
        let mut url = self.endpoint(path)?;
        query.apply_to(&mut url)?;
        self.send(method, url, body).await
    }

    /// GET `path` and decode the body into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, query, None).await?.json()
    }

    /// GET a list endpoint, following `rel="next"` links.
    ///
    /// Stops when no next link remains, after `options.max_pages` pages, or
    /// once `options.limit` items were collected. Next links that leave the
    /// API's origin are not followed.
    #[instrument(skip_all, fields(path = %path, per_page = options.per_page, max_pages = options.max_pages))]
    pub async fn get_paginated(
        &self,
        path: &str,
        query: &QueryParams,
        options: PageOptions,
    ) -> Result<Page, ApiError> {
        let mut query = query.clone();
        query.set("per_page", options.per_page.to_string());

        let mut url = self.endpoint(path)?;
        query.apply_to(&mut url)?;

        let mut page = Page::default();
        loop {
            let response = self.send(Method::GET, url, None).await?;
            page.pages_fetched += 1;

            match response.json::<serde_json::Value>()? {
                serde_json::Value::Array(items) => page.items.extend(items),
                serde_json::Value::Null => {}
                item => page.items.push(item),
            }

            if let Some(limit) = options.limit {
                if page.items.len() >= limit {
                    page.has_more = page.items.len() > limit || response.next_page.is_some();
                    page.items.truncate(limit);
                    break;
                }
            }

            let Some(next) = response.next_page else {
                break;
            };

            if page.pages_fetched >= options.max_pages {
                debug!(pages = page.pages_fetched, "Page cap reached");
                page.has_more = true;
                break;
            }

            let next = self
                .base_url
                .join(&next)
                .map_err(|e| ApiError::invalid_url(format!("next link {next}: {e}")))?;
            if next.origin() != self.base_url.origin() {
                warn!(next = %next, "Ignoring next link outside the Canvas origin");
                page.has_more = true;
                break;
            }
            url = next;
        }

        debug!(
            items = page.items.len(),
            pages = page.pages_fetched,
            has_more = page.has_more,
            "Pagination finished"
        );
        Ok(page)
    }

    /// Run a GraphQL query and return its `data` object.
    #[instrument(skip_all)]
    pub async fn graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.graphql_endpoint()?;
        let body = serde_json::json!({ "query": query, "variables": variables });

        let mut response: serde_json::Value =
            self.send(Method::POST, url, Some(&body)).await?.json()?;

        if let Some(errors) = response.get("errors").and_then(|e| e.as_array()) {
            if !errors.is_empty() {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                            .unwrap_or_else(|| e.to_string())
                    })
                    .collect();
                return Err(ApiError::Query(messages.join("; ")));
            }
        }

        match response.get_mut("data").map(serde_json::Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(ApiError::decode("GraphQL response has no data")),
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ApiError::invalid_url(format!("CANVAS_BASE_URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::invalid_url(format!(
            "CANVAS_BASE_URL must use http or https, got {}",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> CanvasConfig {
        CanvasConfig {
            api_token: Some("test-token".to_string()),
            base_url: format!("{}/api/v1", server.uri()),
            timeout_secs: 5,
        }
    }

    fn courses(range: std::ops::Range<u64>) -> serde_json::Value {
        json!(range.map(|id| json!({ "id": id, "name": format!("Course {id}") })).collect::<Vec<_>>())
    }

    #[test]
    fn test_base_url_is_normalized() {
        let config = CanvasConfig {
            base_url: "https://canvas.test/api/v1".into(),
            ..Default::default()
        };
        let client = CanvasClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://canvas.test/api/v1/");
        assert_eq!(
            client.endpoint("/courses/42").unwrap().as_str(),
            "https://canvas.test/api/v1/courses/42"
        );
        assert_eq!(
            client.graphql_endpoint().unwrap().as_str(),
            "https://canvas.test/api/graphql"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = CanvasConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        let err = CanvasClient::new(&config).unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[test]
    fn test_absolute_paths_are_rejected() {
        let client = CanvasClient::new(&CanvasConfig::default()).unwrap();
        assert!(client.endpoint("https://evil.test/steal").is_err());
        assert!(client.endpoint("//evil.test/steal").is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CanvasConfig {
            api_token: Some("super-secret".into()),
            ..Default::default()
        };
        let client = CanvasClient::new(&config).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("super-secret"));
    }

    #[tokio::test]
    async fn test_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/courses/1"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "name": "Bio" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let course: serde_json::Value = client.get("courses/1", &QueryParams::new()).await.unwrap();
        assert_eq!(course["name"], "Bio");
    }

    #[tokio::test]
    async fn test_missing_token_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = CanvasConfig {
            api_token: None,
            ..config_for(&server)
        };
        let client = CanvasClient::new(&config).unwrap();
        let err = client
            .request(Method::GET, "courses", &QueryParams::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[tokio::test]
    async fn test_unauthorized_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "errors": [{ "message": "Invalid access token." }] })),
            )
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let err = client
            .get::<serde_json::Value>("courses", &QueryParams::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Invalid access token."));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let err = client
            .get::<serde_json::Value>("courses", &QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_pagination_follows_next_links() {
        let server = MockServer::start().await;
        let page2 = format!("{}/api/v1/courses?page=2&per_page=2", server.uri());

        Mock::given(method("GET"))
            .and(path("/api/v1/courses"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(courses(3..4)))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/courses"))
            .and(query_param("per_page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", format!("<{page2}>; rel=\"next\"").as_str())
                    .set_body_json(courses(1..3)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let options = PageOptions {
            per_page: 2,
            max_pages: 20,
            limit: None,
        };
        let page = client
            .get_paginated("courses", &QueryParams::new(), options)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.pages_fetched, 2);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_pagination_stops_at_page_cap() {
        let server = MockServer::start().await;
        let next = format!("{}/api/v1/courses?page=2", server.uri());
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", format!("<{next}>; rel=\"next\"").as_str())
                    .set_body_json(courses(0..5)),
            )
            .expect(3)
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let options = PageOptions {
            per_page: 5,
            max_pages: 3,
            limit: None,
        };
        let page = client
            .get_paginated("courses", &QueryParams::new(), options)
            .await
            .unwrap();
        assert_eq!(page.pages_fetched, 3);
        assert_eq!(page.items.len(), 15);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_pagination_truncates_to_limit() {
        let server = MockServer::start().await;
        let next = format!("{}/api/v1/courses?page=2", server.uri());
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", format!("<{next}>; rel=\"next\"").as_str())
                    .set_body_json(courses(0..4)),
            )
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let page = client
            .get_paginated("courses", &QueryParams::new(), PageOptions::for_limit(Some(10), 4))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.pages_fetched, 3);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_pagination_ignores_foreign_next_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", "<https://elsewhere.test/api/v1/courses?page=2>; rel=\"next\"")
                    .set_body_json(courses(0..2)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let page = client
            .get_paginated("courses", &QueryParams::new(), PageOptions::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_graphql_returns_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .and(body_partial_json(json!({ "variables": {} })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "allCourses": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let data = client.graphql("query { allCourses { id } }", json!({})).await.unwrap();
        assert_eq!(data, json!({ "allCourses": [] }));
    }

    #[tokio::test]
    async fn test_graphql_errors_are_query_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": "Field 'nope' doesn't exist" }]
            })))
            .mount(&server)
            .await;

        let client = CanvasClient::new(&config_for(&server)).unwrap();
        let err = client.graphql("query { nope }", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), "QueryError");
        assert!(err.to_string().contains("doesn't exist"));
    }
}
