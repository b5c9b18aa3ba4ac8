//! Error types for gateway SDK calls.

use caas_sdk_common::Endpoint;

/// Maximum number of characters of a rejected response body kept for diagnostics.
pub const ERROR_BODY_LIMIT: usize = 180;

/// Statuses the gateway uses for transient failures.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Failures surfaced by [`GatewayClient`](crate::GatewayClient) operations.
///
/// The client never recovers locally: every variant reaches the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response was obtained (host unreachable, timeout, broken body stream).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The gateway answered with a status >= 400.
    #[error("Gateway rejected {endpoint} ({status}): {body}")]
    Gateway {
        endpoint: Endpoint,
        status: u16,
        /// Response text, truncated to [`ERROR_BODY_LIMIT`] characters.
        body: String,
    },

    /// A response arrived but its body is not valid JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The client could not be built or a request could not be assembled.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn gateway(endpoint: Endpoint, status: u16, body: &str) -> Self {
        Error::Gateway {
            endpoint,
            status,
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }

    /// HTTP status for gateway rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Gateway { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The client itself makes exactly one attempt per call.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Gateway { status, .. } => RETRYABLE_STATUSES.contains(status),
            Error::Decode(_) | Error::InvalidConfig(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
