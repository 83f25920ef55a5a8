//! Provider and transport configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transport::StaticCredentials;

/// Configuration for [`HttpTransport`](crate::transport::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpTransportConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("ac-mediator/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpTransportConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Credentials for one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key, sent as a query parameter.
    #[serde(default)]
    pub api_key: Option<String>,

    /// OAuth2 access token, sent as a bearer header.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl ProviderConfig {
    /// Creates a configuration holding only an API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            access_token: None,
        }
    }

    /// Returns true if no credential is set.
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.access_token.is_none()
    }
}

/// Configuration for every known provider, keyed by provider name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediatorConfig {
    /// HTTP transport settings.
    #[serde(default)]
    pub transport: HttpTransportConfig,

    /// Per-provider credentials.
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl MediatorConfig {
    /// Sets the credentials of a provider.
    pub fn with_provider(mut self, name: impl Into<String>, config: ProviderConfig) -> Self {
        self.providers.insert(name.into(), config);
        self
    }

    /// Builds a static credential store from the provider credentials.
    pub fn credentials(&self) -> StaticCredentials {
        let mut credentials = StaticCredentials::new();
        for (service, config) in &self.providers {
            if let Some(key) = &config.api_key {
                credentials = credentials.with_api_key(service, key);
            }
            if let Some(token) = &config.access_token {
                credentials = credentials.with_access_token(service, token);
            }
        }
        credentials
    }
}
