//! reqwest-backed executor for [`ProviderRequest`]s.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;
use url::Url;

use super::requests::{self, ProviderRequest, ResultsPage, Timeouts};
use super::traits::BulkTaskApi;
use super::types::{RawBulkDump, RawBulkStatus};
use crate::core::config::Config;
use crate::core::error::{AppError, Result};

/// Client for the BounceBan REST API.
///
/// The API key is supplied per call since each inbound request resolves its own credential.
#[derive(Clone)]
pub struct BounceBanClient {
    http: Client,
    base_url: Url,
    timeouts: Timeouts,
}

impl BounceBanClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Initialization(format!("Failed to build HTTP client: {}", e)))?;

        let mut base = config.api_base_url.trim_end_matches('/').to_string();
        base.push('/');

        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            timeouts: Timeouts {
                lookup: config.lookup_timeout,
                bulk: config.bulk_timeout,
            },
        })
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Sends one request and returns the decoded JSON body.
    pub async fn send(&self, token: &str, request: &ProviderRequest) -> Result<Value> {
        let url = self.base_url.join(request.endpoint.path())?;
        let method = request.endpoint.method();

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, token)
            .header(CONTENT_TYPE, "application/json")
            .timeout(request.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        tracing::debug!(target: "provider", %method, path = request.endpoint.path(), "Calling provider");

        let response = builder.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        tracing::debug!(
            target: "provider",
            %method,
            path = request.endpoint.path(),
            %status,
            elapsed = ?started.elapsed(),
            "Provider responded"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_error_message(&body);
            tracing::warn!(
                target: "provider",
                path = request.endpoint.path(),
                status = status.as_u16(),
                provider_message = message.as_deref().unwrap_or(""),
                "Provider returned an error status"
            );
            return Err(AppError::ProviderHttp {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(classify_transport_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Unexpected(format!("Invalid JSON from provider: {}", e)))
    }

    /// Sends one request and decodes the body into a typed raw response.
    pub async fn call<T: DeserializeOwned>(&self, token: &str, request: &ProviderRequest) -> Result<T> {
        let value = self.send(token, request).await?;
        decode(value)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Unexpected(format!("Unrecognised provider response: {}", e)))
}

fn classify_transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::ProviderTimeout
    } else {
        AppError::Request(err)
    }
}

/// Pulls a human-readable reason out of an error body, if the provider sent one.
fn provider_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl BulkTaskApi for BounceBanClient {
    async fn bulk_status(&self, token: &str, task_id: &str) -> Result<RawBulkStatus> {
        self.call(token, &requests::verify_bulk_status(task_id, &self.timeouts))
            .await
    }

    async fn bulk_dump(&self, token: &str, page: &ResultsPage) -> Result<RawBulkDump> {
        self.call(token, &requests::verify_bulk_dump(page, &self.timeouts))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BounceBanClient {
        let config = Config {
            api_base_url: format!("{}/v1", server.uri()),
            lookup_timeout: Duration::from_millis(500),
            ..Config::default()
        };
        BounceBanClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn sends_raw_token_without_bearer_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/check"))
            .and(header("Authorization", "raw-token"))
            .and(header("Content-Type", "application/json"))
            .and(query_param("domain", "example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"domain_type": "business"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = requests::check(
            &requests::CheckTarget::Domain("example.com".into()),
            client.timeouts(),
        );
        let body = client.send("raw-token", &request).await.unwrap();
        assert_eq!(body["domain_type"], "business");
    }

    #[tokio::test]
    async fn posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/verify/bulk/destroy"))
            .and(body_json(json!({"id": "task-9"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = requests::verify_bulk_destroy("task-9", client.timeouts());
        let body = client.send("k", &request).await.unwrap();
        assert_eq!(body["status"], "deleted");
    }

    #[tokio::test]
    async fn error_status_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/verify/single"))
            .respond_with(
                ResponseTemplate::new(402).set_body_json(json!({"message": "Insufficient credits"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .send("k", &requests::verify_single("a@x.com", client.timeouts()))
            .await
            .unwrap_err();
        match err {
            AppError::ProviderHttp { status, message } => {
                assert_eq!(status, 402);
                assert_eq!(message.as_deref(), Some("Insufficient credits"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn slow_provider_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/verify/bulk/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "completed"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.bulk_status("k", "task-1").await.unwrap_err();
        assert!(matches!(err, AppError::ProviderTimeout));
    }

    #[tokio::test]
    async fn non_json_body_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/verify/bulk/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.bulk_status("k", "task-1").await.unwrap_err();
        assert!(matches!(err, AppError::Unexpected(_)));
    }

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            provider_error_message(r#"{"error": "bad", "message": "Invalid id"}"#).as_deref(),
            Some("Invalid id")
        );
        assert_eq!(
            provider_error_message(r#"{"error": "bad"}"#).as_deref(),
            Some("bad")
        );
        assert_eq!(provider_error_message("not json"), None);
    }
}
