//! Akamai EdgeGrid client for the Domain Ownership API

mod error;
mod http;
mod provider;
mod sign;

use std::time::Duration;

use reqwest::Client;

use crate::config::EdgeGridCredentials;
use crate::error::{ApiError, Result};

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// 默认自动重试次数
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Domain Ownership API base path.
pub(crate) const DOMAINS_PATH: &str = "/domain-validation/v1/domains";

/// EdgeGrid-signed HTTP client implementing [`DomainOwnershipApi`](crate::DomainOwnershipApi).
///
/// # Construction
///
/// ```rust,no_run
/// use akamai_domainownership_api::{EdgeGridClient, EdgeGridCredentials};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = EdgeGridCredentials::load(None, Some("default"))?;
/// let client = EdgeGridClient::builder(credentials)
///     .max_retries(3)
///     .account_switch_key("1-ABCDE:1-2345")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EdgeGridClient {
    pub(crate) client: Client,
    pub(crate) credentials: EdgeGridCredentials,
    pub(crate) base_url: String,
    pub(crate) account_switch_key: Option<String>,
    pub(crate) max_retries: u32,
}

/// Builder for [`EdgeGridClient`].
pub struct EdgeGridClientBuilder {
    credentials: EdgeGridCredentials,
    base_url: Option<String>,
    account_switch_key: Option<String>,
    max_retries: u32,
    request_timeout: Duration,
}

impl EdgeGridClientBuilder {
    fn new(credentials: EdgeGridCredentials) -> Self {
        Self {
            credentials,
            base_url: None,
            account_switch_key: None,
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Send requests to this base URL instead of `https://{host}`.
    ///
    /// The signature still covers the configured host.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Act on behalf of another account (`accountSwitchKey` query parameter).
    pub fn account_switch_key(mut self, key: impl Into<String>) -> Self {
        self.account_switch_key = Some(key.into());
        self
    }

    /// Per-request timeout (default: 60s).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the [`EdgeGridClient`] instance.
    pub fn build(self) -> Result<EdgeGridClient> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ApiError::NetworkError {
                detail: format!("failed to create HTTP client: {e}"),
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| format!("https://{}", self.credentials.host))
            .trim_end_matches('/')
            .to_string();

        Ok(EdgeGridClient {
            client,
            credentials: self.credentials,
            base_url,
            account_switch_key: self.account_switch_key,
            max_retries: self.max_retries,
        })
    }
}

impl EdgeGridClient {
    /// Creates a client with default settings.
    pub fn new(credentials: EdgeGridCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(credentials: EdgeGridCredentials) -> EdgeGridClientBuilder {
        EdgeGridClientBuilder::new(credentials)
    }
}
