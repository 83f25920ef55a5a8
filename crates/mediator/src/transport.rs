//! HTTP transport and credential collaborators.
//!
//! The core never talks to the network itself. A search hands its finished
//! parameter set to a [`Transport`], after asking a [`CredentialProvider`]
//! for the authentication parameters the provider expects.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AuthError, TransportError};
use crate::params::QueryParams;

/// How a provider expects requests to be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    /// No authentication.
    None,
    /// API key passed as the query parameter `param`.
    ApiKey {
        /// Name of the query parameter carrying the key.
        param: &'static str,
    },
    /// OAuth2 access token passed as a bearer `Authorization` header.
    OAuth,
}

impl AuthScheme {
    /// Short name of the scheme.
    pub fn name(&self) -> &'static str {
        match self {
            AuthScheme::None => "none",
            AuthScheme::ApiKey { .. } => "apikey",
            AuthScheme::OAuth => "oauth",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Authentication data to inject into a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthParams {
    /// Extra query parameters.
    pub query: QueryParams,
    /// Extra headers.
    pub headers: BTreeMap<String, String>,
}

impl AuthParams {
    /// Auth data consisting of one query parameter.
    pub fn query_param(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            query: QueryParams::from([(name.into(), value.into())]),
            headers: BTreeMap::new(),
        }
    }

    /// Auth data consisting of a bearer token header.
    pub fn bearer(token: &str) -> Self {
        Self {
            query: QueryParams::new(),
            headers: BTreeMap::from([("Authorization".to_string(), format!("Bearer {}", token))]),
        }
    }

    /// Returns true if nothing is injected.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.headers.is_empty()
    }
}

/// Sends provider requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET on `endpoint` and returns the decoded JSON body.
    async fn send_request(
        &self,
        endpoint: &str,
        params: &QueryParams,
        auth: &AuthParams,
    ) -> Result<Value, TransportError>;
}

/// Supplies authentication parameters for provider requests.
pub trait CredentialProvider: Send + Sync {
    /// Returns what must be injected into a request to `service` using `scheme`.
    fn auth_for_request(&self, service: &str, scheme: AuthScheme) -> Result<AuthParams, AuthError>;
}

/// In-memory credentials keyed by service name.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    api_keys: BTreeMap<String, String>,
    tokens: BTreeMap<String, String>,
}

impl StaticCredentials {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the API key of a service.
    pub fn with_api_key(mut self, service: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_keys.insert(service.into(), key.into());
        self
    }

    /// Stores the OAuth2 access token of a service.
    pub fn with_access_token(mut self, service: impl Into<String>, token: impl Into<String>) -> Self {
        self.tokens.insert(service.into(), token.into());
        self
    }

    /// API key of a service, if configured.
    pub fn api_key(&self, service: &str) -> Option<&str> {
        self.api_keys.get(service).map(String::as_str)
    }

    /// Access token of a service, if configured.
    pub fn access_token(&self, service: &str) -> Option<&str> {
        self.tokens.get(service).map(String::as_str)
    }
}

impl CredentialProvider for StaticCredentials {
    fn auth_for_request(&self, service: &str, scheme: AuthScheme) -> Result<AuthParams, AuthError> {
        let missing = || AuthError::MissingCredentials {
            service: service.to_string(),
            scheme: scheme.name().to_string(),
        };
        match scheme {
            AuthScheme::None => Ok(AuthParams::default()),
            AuthScheme::ApiKey { param } => self
                .api_key(service)
                .map(|key| AuthParams::query_param(param, key))
                .ok_or_else(missing),
            AuthScheme::OAuth => self
                .access_token(service)
                .map(AuthParams::bearer)
                .ok_or_else(missing),
        }
    }
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use reqwest::Client;
    use serde_json::Value;
    use tracing::{debug, info};
    use url::Url;

    use super::{AuthParams, Transport};
    use crate::config::HttpTransportConfig;
    use crate::error::TransportError;
    use crate::params::QueryParams;

    /// [`Transport`] backed by `reqwest`.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: Client,
        config: HttpTransportConfig,
    }

    impl HttpTransport {
        /// Builds the HTTP client.
        pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
            let client = Client::builder()
                .timeout(config.timeout())
                .user_agent(config.user_agent.clone())
                .build()
                .map_err(|e| TransportError::Request {
                    endpoint: String::new(),
                    message: format!("failed to build HTTP client: {}", e),
                    source: Some(Box::new(e)),
                })?;
            Ok(Self { client, config })
        }

        fn map_send_error(&self, endpoint: &str, err: reqwest::Error) -> TransportError {
            if err.is_timeout() {
                TransportError::Timeout {
                    endpoint: endpoint.to_string(),
                    timeout_ms: self.config.timeout_ms,
                }
            } else {
                TransportError::Request {
                    endpoint: endpoint.to_string(),
                    message: err.to_string(),
                    source: Some(Box::new(err)),
                }
            }
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn send_request(
            &self,
            endpoint: &str,
            params: &QueryParams,
            auth: &AuthParams,
        ) -> Result<Value, TransportError> {
            let url = Url::parse(endpoint).map_err(|e| TransportError::Request {
                endpoint: endpoint.to_string(),
                message: format!("invalid endpoint URL: {}", e),
                source: Some(Box::new(e)),
            })?;

            let mut request = self.client.get(url).query(params).query(&auth.query);
            for (name, value) in &auth.headers {
                request = request.header(name.as_str(), value.as_str());
            }

            info!(endpoint = %endpoint, params = params.len(), "Sending provider request");

            let response = request
                .send()
                .await
                .map_err(|e| self.map_send_error(endpoint, e))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(TransportError::Status {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response
                .json::<Value>()
                .await
                .map_err(|e| TransportError::Decode {
                    endpoint: endpoint.to_string(),
                    message: e.to_string(),
                })?;
            debug!(endpoint = %endpoint, status = status.as_u16(), "Provider responded");
            Ok(body)
        }
    }

}
