//! Per-call request header construction.

use caas_sdk_common::headers;

use crate::config::ClientConfig;
use crate::ids::{Clock, NonceSource};

const CORRELATION_PREFIX: &str = "sdkpy_";
const IDEMPOTENCY_PREFIX: &str = "idem_";

/// Which optional headers a call carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderOptions {
    pub include_api_key: bool,
    pub include_project_id: bool,
    /// Adds `idempotency-key`, `x-timestamp` and `x-nonce`.
    pub include_idempotency: bool,
}

impl HeaderOptions {
    /// API key and project, used by the read-only endpoints.
    pub const fn standard() -> Self {
        Self {
            include_api_key: true,
            include_project_id: true,
            include_idempotency: false,
        }
    }

    /// Session creation: standard plus replay protection.
    pub const fn session() -> Self {
        Self {
            include_idempotency: true,
            ..Self::standard()
        }
    }

    /// Calls authenticated by a token rather than the API key.
    pub const fn token_only() -> Self {
        Self {
            include_api_key: false,
            include_project_id: false,
            include_idempotency: false,
        }
    }
}

/// Ordered header list for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders(Vec<(&'static str, String)>);

impl RequestHeaders {
    /// Set a header, replacing any previous value.
    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// First non-empty project id: the call argument, then the configured default.
pub fn resolve_project_id<'a>(
    argument: Option<&'a str>,
    configured: Option<&'a str>,
) -> Option<&'a str> {
    argument
        .filter(|p| !p.is_empty())
        .or(configured.filter(|p| !p.is_empty()))
}

/// Builds headers from the client config and the injected id sources.
pub struct HeaderBuilder<'a> {
    config: &'a ClientConfig,
    clock: &'a dyn Clock,
    nonce: &'a dyn NonceSource,
}

impl<'a> HeaderBuilder<'a> {
    pub fn new(
        config: &'a ClientConfig,
        clock: &'a dyn Clock,
        nonce: &'a dyn NonceSource,
    ) -> Self {
        Self {
            config,
            clock,
            nonce,
        }
    }

    /// Build the headers for one call.
    ///
    /// `project_id` is the call argument, if any; it takes precedence over the
    /// configured default.
    pub fn build(&self, options: HeaderOptions, project_id: Option<&str>) -> RequestHeaders {
        let now = self.clock.now_millis();
        let mut out = RequestHeaders::default();

        out.insert(headers::CONTENT_TYPE, headers::JSON);
        out.insert(headers::CORRELATION_ID, format!("{CORRELATION_PREFIX}{now}"));

        if options.include_api_key {
            out.insert(headers::API_KEY, self.config.api_key());
        }

        if options.include_project_id {
            if let Some(project) = resolve_project_id(project_id, self.config.project_id()) {
                out.insert(headers::PROJECT_ID, project);
            }
        }

        if options.include_idempotency {
            out.insert(headers::IDEMPOTENCY_KEY, format!("{IDEMPOTENCY_PREFIX}{now}"));
            out.insert(headers::TIMESTAMP, (now / 1000).to_string());
            out.insert(headers::NONCE, format!("{}_{}", now, self.nonce.suffix()));
        }

        out
    }
}
