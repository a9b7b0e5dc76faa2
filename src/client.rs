//! Request executor for the Instasent REST API.
//!
//! Issues exactly one HTTP call per [`RequestDescriptor`]: no retries, no
//! caching. Failures come back as normalized [`ApiError`]s.

use crate::config::ApiConfig;
use crate::credentials::BearerCredentials;
use crate::endpoint::API_BASE_URL;
use crate::error::{normalize, ApiError};
use crate::request::RequestDescriptor;
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP executor bound to one API base URL.
///
/// Stateless apart from the underlying `reqwest` client, so one executor can
/// serve any number of concurrent calls.
#[derive(Clone, Debug)]
pub struct Executor {
    http_client: Client,
    base_url: String,
}

impl Executor {
    /// Create an executor using the default Instasent API base URL.
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL.to_string())
    }

    /// Create an executor with a custom base URL (for testing with a mock server).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
        }
    }

    /// Create an executor from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute one request.
    ///
    /// Attaches `Authorization: Bearer <token>`; a JSON body also sets
    /// `Content-Type: application/json`.
    ///
    /// # Returns
    /// * `Ok(Value)` - Parsed JSON body; `{}` for an empty body, a JSON
    ///   string for a non-JSON body
    /// * `Err(ApiError::Http)` - Non-2xx status, message normalized
    /// * `Err(ApiError::Transport)` - No response could be read
    pub async fn execute(
        &self,
        credentials: &dyn BearerCredentials,
        request: &RequestDescriptor,
    ) -> Result<Value, ApiError> {
        let url = request.url(&self.base_url);
        debug!(method = %request.method, url = %url, "Sending upstream request");

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .bearer_auth(credentials.api_token());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            // The status is known even when the body cannot be read.
            let body = match response.text().await {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!(status = status.as_u16(), error = %e, "Failed to read error body");
                    None
                }
            };
            let error = normalize(status.as_u16(), body.as_deref());
            debug!(status = status.as_u16(), error = %error, "Upstream request failed");
            return Err(error);
        }

        let text = response.text().await?;
        Ok(parse_body(&text))
    }

    /// Run the credential test request (`GET` on the credentials' scope).
    pub async fn test_credentials(&self, credentials: &dyn BearerCredentials) -> Result<(), ApiError> {
        let request = RequestDescriptor::get(credentials.test_path());
        self.execute(credentials, &request).await.map(|_| ())
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{IngestCredentials, ProductCredentials};
    use crate::request::QueryParams;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn product() -> ProductCredentials {
        ProductCredentials::new("test_token", "uid-1")
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_without_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/project/uid-1")
            .match_header("authorization", "Bearer test_token")
            .match_header("content-type", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"entity":{"uid":"uid-1","name":"Shop"}}"#)
            .create_async()
            .await;

        let executor = Executor::with_base_url(server.url());
        let value = executor
            .execute(&product(), &RequestDescriptor::get("/project/uid-1"))
            .await
            .unwrap();

        assert_eq!(value["entity"]["name"], "Shop");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/uid-1/audience/search")
            .match_header("authorization", "Bearer test_token")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"limit": 50})))
            .with_status(200)
            .with_body(r#"{"entities":[]}"#)
            .create_async()
            .await;

        let executor = Executor::with_base_url(server.url());
        let request =
            RequestDescriptor::post("/project/uid-1/audience/search").with_body(json!({"limit": 50}));
        let value = executor.execute(&product(), &request).await.unwrap();

        assert_eq!(value["entities"], json!([]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_flags_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/p/datasource/dsapi/stream/contacts?_sync")
            .with_status(202)
            .with_body("")
            .create_async()
            .await;

        let executor = Executor::with_base_url(server.url());
        let credentials = IngestCredentials::new("p", "", "t");
        let mut query = QueryParams::new();
        query.flag("_sync");
        let request = RequestDescriptor::post(format!("{}/stream/contacts", credentials.datasource_path()))
            .with_body(json!([{"_user_id": "u1"}]))
            .with_query(query);

        let value = executor.execute(&credentials, &request).await.unwrap();
        assert_eq!(value, json!({}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_json_success_body_returned_as_string() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/project/uid-1")
            .with_status(200)
            .with_body("OK")
            .create_async()
            .await;

        let executor = Executor::with_base_url(server.url());
        let value = executor
            .execute(&product(), &RequestDescriptor::get("/project/uid-1"))
            .await
            .unwrap();
        assert_eq!(value, json!("OK"));
    }

    #[tokio::test]
    async fn test_http_error_normalized() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/project/uid-1/campaign/9")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Campaign not found","error":"not_found"}"#)
            .create_async()
            .await;

        let executor = Executor::with_base_url(server.url());
        let err = executor
            .execute(&product(), &RequestDescriptor::get("/project/uid-1/campaign/9"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP 404: Campaign not found");
    }

    #[tokio::test]
    async fn test_http_error_without_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/project/uid-1/x")
            .with_status(500)
            .create_async()
            .await;

        let executor = Executor::with_base_url(server.url());
        let err = executor
            .execute(&product(), &RequestDescriptor::delete("/project/uid-1/x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 9 of the loopback interface.
        let executor = Executor::with_base_url("http://127.0.0.1:9".to_string());
        let err = executor
            .execute(&product(), &RequestDescriptor::get("/project/uid-1"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), None);
        assert!(matches!(err, ApiError::Transport { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_credentials_test_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/project/p/datasource/ds1/stream")
            .match_header("authorization", "Bearer t")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let executor = Executor::with_base_url(server.url());
        executor
            .test_credentials(&IngestCredentials::new("p", "ds1", "t"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_from_config() {
        let config = ApiConfig {
            base_url: "http://localhost:1/v1".to_string(),
            timeout_secs: Some(5),
            user_agent: "test-agent".to_string(),
        };
        let executor = Executor::from_config(&config).unwrap();
        assert_eq!(executor.base_url(), "http://localhost:1/v1");
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\n\r\npartia")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let executor = Executor::with_base_url(format!("http://{}", addr));
        let err = executor
            .execute(&product(), &RequestDescriptor::get("/project/uid-1"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert_eq!(err.message(), "HTTP 503");
    }
}
