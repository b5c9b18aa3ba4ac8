//! Gateway SDK client.

use std::sync::Arc;
use std::time::Instant;

use caas_sdk_common::headers::{AUTHORIZATION, CORRELATION_ID};
use caas_sdk_common::{Endpoint, RefreshRequest, SessionCreatePayload};
use reqwest::Method;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::headers::{resolve_project_id, HeaderBuilder, HeaderOptions, RequestHeaders};
use crate::ids::{Clock, NonceSource, RandomNonce, SystemClock};
use crate::transport::{GatewayRequest, HttpTransport, RawResponse, ReqwestTransport};

/// Client for the gateway's SDK session API.
///
/// Stateless apart from its immutable configuration: every operation makes
/// exactly one HTTP request and the client can be shared across tasks.
/// Successful results are the response JSON, or `None` for `204 No Content`.
pub struct GatewayClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    nonce: Arc<dyn NonceSource>,
}

impl GatewayClient {
    /// Create a client using the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout()?)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            clock: Arc::new(SystemClock),
            nonce: Arc::new(RandomNonce),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_nonce_source(mut self, nonce: impl NonceSource + 'static) -> Self {
        self.nonce = Arc::new(nonce);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /api/v1/sdk/health`
    pub async fn health(&self) -> Result<Option<Value>> {
        let headers = self.headers(HeaderOptions::standard(), None);
        self.request(Method::GET, Endpoint::Health, headers, None)
            .await
    }

    /// `GET /api/v1/sdk/capabilities`
    pub async fn capabilities(&self) -> Result<Option<Value>> {
        let headers = self.headers(HeaderOptions::standard(), None);
        self.request(Method::GET, Endpoint::Capabilities, headers, None)
            .await
    }

    /// `POST /api/v1/sdk/session`
    ///
    /// `project_id` overrides the configured default in both the
    /// `x-project-id` header and the body.
    pub async fn create_session(
        &self,
        user_external_id: &str,
        project_id: Option<&str>,
    ) -> Result<Option<Value>> {
        let mut payload = SessionCreatePayload::new(user_external_id);
        payload.project_id = project_id.map(str::to_string);
        self.create_session_with(payload).await
    }

    /// `POST /api/v1/sdk/session` with a full payload, including `user_data`.
    pub async fn create_session_with(
        &self,
        mut payload: SessionCreatePayload,
    ) -> Result<Option<Value>> {
        let project_id =
            resolve_project_id(payload.project_id.as_deref(), self.config.project_id())
                .map(str::to_string);
        let headers = self.headers(HeaderOptions::session(), project_id.as_deref());
        payload.project_id = project_id;

        let body = serde_json::to_value(&payload)
            .map_err(|e| Error::InvalidConfig(format!("unserializable session payload: {}", e)))?;
        self.request(Method::POST, Endpoint::Session, headers, Some(body))
            .await
    }

    /// `POST /api/v1/sdk/refresh`, authenticated by the refresh token alone.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Option<Value>> {
        let headers = self.headers(HeaderOptions::token_only(), None);
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: refresh_token.to_string(),
        })
        .map_err(|e| Error::InvalidConfig(format!("unserializable refresh request: {}", e)))?;

        self.request(Method::POST, Endpoint::Refresh, headers, Some(body))
            .await
    }

    /// `POST /api/v1/sdk/logout`, authenticated by the access token.
    pub async fn logout(&self, access_token: &str) -> Result<Option<Value>> {
        let mut headers = self.headers(HeaderOptions::token_only(), None);
        headers.insert(AUTHORIZATION, format!("Bearer {}", access_token));

        self.request(Method::POST, Endpoint::Logout, headers, None)
            .await
    }

    fn headers(&self, options: HeaderOptions, project_id: Option<&str>) -> RequestHeaders {
        HeaderBuilder::new(&self.config, self.clock.as_ref(), self.nonce.as_ref())
            .build(options, project_id)
    }

    async fn request(
        &self,
        method: Method,
        endpoint: Endpoint,
        headers: RequestHeaders,
        body: Option<Value>,
    ) -> Result<Option<Value>> {
        let request = GatewayRequest {
            method,
            endpoint,
            url: self.config.url(endpoint.path()),
            headers,
            body,
        };
        let correlation_id = request
            .headers
            .get(CORRELATION_ID)
            .unwrap_or_default()
            .to_string();

        let start = Instant::now();
        let result = self.transport.send(&request).await;
        let duration = start.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(
                    method = %request.method,
                    path = %endpoint,
                    correlation_id = %correlation_id,
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "Gateway request failed"
                );
                return Err(e);
            }
        };

        tracing::debug!(
            method = %request.method,
            path = %endpoint,
            correlation_id = %correlation_id,
            status = %response.status,
            duration_ms = %duration.as_millis(),
            "Gateway request"
        );

        interpret(endpoint, response)
    }
}

/// Map a raw response onto the call result.
fn interpret(endpoint: Endpoint, response: RawResponse) -> Result<Option<Value>> {
    if response.status >= 400 {
        tracing::warn!(
            path = %endpoint,
            status = %response.status,
            "Gateway rejected request"
        );
        return Err(Error::gateway(endpoint, response.status, &response.body));
    }

    if response.status == 204 {
        return Ok(None);
    }

    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| Error::Decode(format!("{} returned invalid JSON: {}", endpoint, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{FixedClock, FixedNonce};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    const NOW: i64 = 1_700_000_000_000;

    /// Records every request and answers with a canned response.
    struct RecordingTransport {
        requests: Mutex<Vec<GatewayRequest>>,
        response: Result<RawResponse>,
    }

    impl RecordingTransport {
        fn responding(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                response: Ok(RawResponse {
                    status,
                    body: body.to_string(),
                }),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                response: Err(Error::Transport(message.to_string())),
            })
        }

        fn last(&self) -> GatewayRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn send(&self, request: &GatewayRequest) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(Error::Transport(message)) => Err(Error::Transport(message.clone())),
                Err(other) => panic!("unsupported canned error: {other:?}"),
            }
        }
    }

    fn client(transport: Arc<RecordingTransport>, project: Option<&str>) -> GatewayClient {
        let mut config = ClientConfig::new("https://gw.example.com/", "key-1");
        if let Some(project) = project {
            config = config.with_project_id(project);
        }
        GatewayClient::with_transport(config, transport)
            .with_clock(FixedClock(NOW))
            .with_nonce_source(FixedNonce("n0nce123".to_string()))
    }

    #[tokio::test]
    async fn test_health_request_shape() {
        let transport = RecordingTransport::responding(200, r#"{"status":"ok"}"#);
        let client = client(transport.clone(), Some("project-1"));

        let result = client.health().await.unwrap();
        assert_eq!(result, Some(json!({"status": "ok"})));

        let request = transport.last();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "https://gw.example.com/api/v1/sdk/health");
        assert_eq!(request.body, None);
        assert_eq!(request.headers.get("x-correlation-id"), Some("sdkpy_1700000000000"));
        assert_eq!(request.headers.get("x-api-key"), Some("key-1"));
        assert_eq!(request.headers.get("x-project-id"), Some("project-1"));
        assert!(!request.headers.contains("idempotency-key"));
    }

    #[tokio::test]
    async fn test_capabilities_path() {
        let transport = RecordingTransport::responding(200, r#"{"features":["chat"]}"#);
        let client = client(transport.clone(), None);

        client.capabilities().await.unwrap();

        let request = transport.last();
        assert_eq!(request.url, "https://gw.example.com/api/v1/sdk/capabilities");
        assert!(!request.headers.contains("x-project-id"));
    }

    #[tokio::test]
    async fn test_create_session_uses_configured_project() {
        let transport = RecordingTransport::responding(
            201,
            r#"{"access_token":"at","refresh_token":"rt","expires_in":900,"token_type":"Bearer"}"#,
        );
        let client = client(transport.clone(), Some("project-1"));

        let result = client.create_session("user-42", None).await.unwrap().unwrap();
        assert_eq!(result["access_token"], "at");

        let request = transport.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://gw.example.com/api/v1/sdk/session");
        assert_eq!(request.headers.get("x-project-id"), Some("project-1"));
        assert_eq!(request.headers.get("idempotency-key"), Some("idem_1700000000000"));
        assert_eq!(request.headers.get("x-timestamp"), Some("1700000000"));
        assert_eq!(request.headers.get("x-nonce"), Some("1700000000000_n0nce123"));
        assert_eq!(
            request.body,
            Some(json!({"user_external_id": "user-42", "project_id": "project-1"}))
        );
    }

    #[tokio::test]
    async fn test_create_session_argument_overrides_project() {
        let transport = RecordingTransport::responding(200, "{}");
        let client = client(transport.clone(), Some("project-1"));

        client.create_session("user-42", Some("override")).await.unwrap();

        let request = transport.last();
        assert_eq!(request.headers.get("x-project-id"), Some("override"));
        assert_eq!(request.body.unwrap()["project_id"], "override");
    }

    #[tokio::test]
    async fn test_create_session_omits_unknown_project() {
        let transport = RecordingTransport::responding(200, "{}");
        let client = client(transport.clone(), None);

        client.create_session("user-42", None).await.unwrap();

        let request = transport.last();
        assert!(!request.headers.contains("x-project-id"));
        assert_eq!(request.body, Some(json!({"user_external_id": "user-42"})));
    }

    #[tokio::test]
    async fn test_create_session_with_user_data() {
        let transport = RecordingTransport::responding(200, "{}");
        let client = client(transport.clone(), Some("project-1"));

        let mut data = serde_json::Map::new();
        data.insert("plan".to_string(), json!("pro"));
        client
            .create_session_with(SessionCreatePayload::new("user-42").with_user_data(data))
            .await
            .unwrap();

        let body = transport.last().body.unwrap();
        assert_eq!(body["user_data"]["plan"], "pro");
        assert_eq!(body["project_id"], "project-1");
    }

    #[tokio::test]
    async fn test_refresh_omits_api_key() {
        let transport = RecordingTransport::responding(200, "{}");
        let client = client(transport.clone(), Some("project-1"));

        client.refresh("rt-1").await.unwrap();

        let request = transport.last();
        assert_eq!(request.url, "https://gw.example.com/api/v1/sdk/refresh");
        assert!(!request.headers.contains("x-api-key"));
        assert!(!request.headers.contains("x-project-id"));
        assert_eq!(request.headers.get("content-type"), Some("application/json"));
        assert_eq!(request.body, Some(json!({"refresh_token": "rt-1"})));
    }

    #[tokio::test]
    async fn test_logout_sends_bearer_without_api_key() {
        let transport = RecordingTransport::responding(204, "");
        let client = client(transport.clone(), Some("project-1"));

        let result = client.logout("at-1").await.unwrap();
        assert_eq!(result, None);

        let request = transport.last();
        assert_eq!(request.url, "https://gw.example.com/api/v1/sdk/logout");
        assert_eq!(request.headers.get("authorization"), Some("Bearer at-1"));
        assert!(!request.headers.contains("x-api-key"));
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_no_content_from_any_endpoint() {
        let transport = RecordingTransport::responding(204, "");
        let client = client(transport, None);

        assert_eq!(client.health().await.unwrap(), None);
        assert_eq!(client.capabilities().await.unwrap(), None);
        assert_eq!(client.create_session("u", None).await.unwrap(), None);
        assert_eq!(client.refresh("rt").await.unwrap(), None);
        assert_eq!(client.logout("at").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_server_error_becomes_gateway_error() {
        let transport = RecordingTransport::responding(500, "boom");
        let client = client(transport, None);

        let err = client.health().await.unwrap_err();
        match err {
            Error::Gateway {
                endpoint,
                status,
                body,
            } => {
                assert_eq!(endpoint, Endpoint::Health);
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let transport = RecordingTransport::responding(200, "<html>not json</html>");
        let client = client(transport, None);

        let err = client.capabilities().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let transport = RecordingTransport::failing("connection refused");
        let client = client(transport.clone(), None);

        let err = client.refresh("rt").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_new_rejects_bad_timeout() {
        let config = ClientConfig::new("https://gw", "key").with_timeout_secs(0.0);
        assert!(matches!(
            GatewayClient::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
