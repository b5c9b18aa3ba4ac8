//! HTTP transport abstraction.
//!
//! [`GatewayClient`](crate::GatewayClient) assembles a complete
//! [`GatewayRequest`] and hands it to an [`HttpTransport`]. The default
//! transport is [`ReqwestTransport`]; tests and embedders may supply their own.

use std::time::Duration;

use async_trait::async_trait;
use caas_sdk_common::Endpoint;
use reqwest::{Client, Method};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::headers::RequestHeaders;

/// A fully assembled gateway request.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub url: String,
    pub headers: RequestHeaders,
    pub body: Option<Value>,
}

/// Status and raw text of a gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns whatever the gateway answered.
///
/// Implementations must not interpret the status: any response obtained is
/// `Ok`, only failures to obtain one are [`Error::Transport`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &GatewayRequest) -> Result<RawResponse>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    /// Build a transport whose calls are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(http_client))
    }

    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &GatewayRequest) -> Result<RawResponse> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), &request.url);

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(send_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}

fn send_error(e: reqwest::Error) -> Error {
    if e.is_builder() {
        Error::InvalidConfig(format!("invalid request: {}", e))
    } else if e.is_timeout() {
        Error::Transport(format!("request timed out: {}", e))
    } else {
        Error::Transport(e.to_string())
    }
}
