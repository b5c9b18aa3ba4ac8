//! CaaS SDK
//!
//! Thin client for the gateway's SDK session API: health, capability
//! discovery, session creation, token refresh and logout.
//!
//! ```no_run
//! # async fn run() -> caas_sdk::Result<()> {
//! use caas_sdk::{ClientConfig, GatewayClient};
//!
//! let config = ClientConfig::new("https://gateway.example.com", "sk_test_123")
//!     .with_project_id("project-1");
//! let client = GatewayClient::new(config)?;
//!
//! if let Some(session) = client.create_session("user-42", None).await? {
//!     println!("access token: {}", session["access_token"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod ids;
pub mod transport;

pub use caas_sdk_common::{Endpoint, SessionCreatePayload, SessionTokenBundle};
pub use client::GatewayClient;
pub use crate::config::{ClientConfig, ProbeConfig};
pub use error::{Error, Result};
pub use headers::{HeaderOptions, RequestHeaders};
pub use ids::{Clock, FixedClock, FixedNonce, NonceSource, RandomNonce, SystemClock};
pub use transport::{GatewayRequest, HttpTransport, RawResponse, ReqwestTransport};
