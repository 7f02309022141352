//! # akamai-domainownership-api
//!
//! Typed async client for the Akamai Domain Ownership (domain validation) API.
//!
//! The API is reached through five operations, all keyed by the composite
//! identity [`DomainKey`] (`domain_name` + [`ValidationScope`]):
//!
//! | Operation | Endpoint | Notes |
//! |-----------|----------|-------|
//! | [`search_domains`](DomainOwnershipApi::search_domains) | `POST /domains/search` | Missing domains are omitted, at most 1000 per call |
//! | [`add_domains`](DomainOwnershipApi::add_domains) | `POST /domains` | Per-domain partial success |
//! | [`delete_domains`](DomainOwnershipApi::delete_domains) | `DELETE /domains` | All-or-nothing |
//! | [`validate_domains`](DomainOwnershipApi::validate_domains) | `POST /domains/validate-now` | At most 100 per call |
//! | [`invalidate_domains`](DomainOwnershipApi::invalidate_domains) | `POST /domains/invalidate` | |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use akamai_domainownership_api::{
//!     DomainKey, DomainOwnershipApi, EdgeGridClient, EdgeGridCredentials,
//!     SearchDomainsRequest, ValidationScope,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // ~/.edgerc, section "default"; AKAMAI_* environment variables win when complete
//!     let credentials = EdgeGridCredentials::load(None, None)?;
//!     let client = EdgeGridClient::new(credentials)?;
//!
//!     let found = client
//!         .search_domains(&SearchDomainsRequest {
//!             include_all: true,
//!             domains: vec![DomainKey::new("www.example.com", ValidationScope::Host)],
//!         })
//!         .await?;
//!     for domain in &found.domains {
//!         println!("{} {}", domain.key(), domain.domain_status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ApiError>`](ApiError). Transient errors
//! (`NetworkError`, `Timeout`, `RateLimited`) are retried with exponential
//! backoff before being surfaced; each retry is signed again.

mod config;
mod edgegrid;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;

pub use config::{ConfigError, DEFAULT_MAX_BODY, DEFAULT_SECTION, EdgeGridCredentials};
pub use edgegrid::{EdgeGridClient, EdgeGridClientBuilder};
pub use error::{ApiError, Result};
pub use traits::DomainOwnershipApi;
pub use types::{
    AddDomainsRequest, AddDomainsResponse, CnameRecord, DeleteDomainsRequest, DomainError,
    DomainKey, DomainRecord, DomainStatus, HttpFile, HttpRedirect, InvalidateDomainsRequest,
    InvalidateDomainsResponse, MAX_SEARCH_DOMAINS, MAX_VALIDATE_DOMAINS, SearchDomainsRequest,
    SearchDomainsResponse, TxtRecord, ValidateDomainItem, ValidateDomainsRequest,
    ValidateDomainsResponse, ValidationChallenge, ValidationLevel, ValidationMethod,
    ValidationScope,
};
