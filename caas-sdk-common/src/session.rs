//! Session payloads exchanged with the gateway.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/v1/sdk/session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCreatePayload {
    /// Identifier of the end user in the embedding application.
    pub user_external_id: String,
    /// Project to bind the session to. Omitted from the JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Free-form profile data forwarded to the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Map<String, Value>>,
}

impl SessionCreatePayload {
    pub fn new(user_external_id: impl Into<String>) -> Self {
        Self {
            user_external_id: user_external_id.into(),
            project_id: None,
            user_data: None,
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_user_data(mut self, user_data: Map<String, Value>) -> Self {
        self.user_data = Some(user_data);
        self
    }
}

/// Body of `POST /api/v1/sdk/refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens issued by the gateway on session creation and refresh.
///
/// The client returns gateway responses as raw JSON; this type is for callers
/// that want to deserialize them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub token_type: String,
}

impl SessionTokenBundle {
    /// Deserialize a bundle from a gateway JSON response.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
