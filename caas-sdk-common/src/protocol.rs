//! HTTP protocol constants for the gateway SDK API.
//!
//! # Protocol Overview
//!
//! Every call is a single JSON-over-HTTP exchange against the gateway's
//! `/api/v1/sdk` surface:
//!
//! 1. `GET  /health` and `GET /capabilities` authenticate with the static API key
//! 2. `POST /session` authenticates with the API key and carries replay
//!    protection headers (`idempotency-key`, `x-timestamp`, `x-nonce`)
//! 3. `POST /refresh` authenticates with the refresh token in the body
//! 4. `POST /logout` authenticates with the access token as a bearer credential
//!
//! # Security
//!
//! - Always use `https://` in production; the API key travels in a header
//! - `refresh` and `logout` never carry the API key

use serde::{Deserialize, Serialize};

/// Header names used by the gateway SDK API.
pub mod headers {
    pub const CONTENT_TYPE: &str = "content-type";
    pub const CORRELATION_ID: &str = "x-correlation-id";
    pub const API_KEY: &str = "x-api-key";
    pub const PROJECT_ID: &str = "x-project-id";
    pub const IDEMPOTENCY_KEY: &str = "idempotency-key";
    pub const TIMESTAMP: &str = "x-timestamp";
    pub const NONCE: &str = "x-nonce";
    pub const AUTHORIZATION: &str = "authorization";

    pub const JSON: &str = "application/json";
}

/// Endpoints exposed by the gateway SDK API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Health,
    Capabilities,
    Session,
    Refresh,
    Logout,
}

impl Endpoint {
    /// All endpoints, in the order they appear in the API reference.
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Health,
        Endpoint::Capabilities,
        Endpoint::Session,
        Endpoint::Refresh,
        Endpoint::Logout,
    ];

    /// Path relative to the gateway base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Health => "/api/v1/sdk/health",
            Endpoint::Capabilities => "/api/v1/sdk/capabilities",
            Endpoint::Session => "/api/v1/sdk/session",
            Endpoint::Refresh => "/api/v1/sdk/refresh",
            Endpoint::Logout => "/api/v1/sdk/logout",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
