//! Akamai Domain Ownership reconciliation engine
//!
//! Computes, for a desired set of domains (plan), an observed set (API) and a
//! previously persisted set (state), which domains must be added, validated,
//! invalidated or deleted, and drives those calls through a
//! [`DomainOwnershipApi`](akamai_domainownership_api::DomainOwnershipApi):
//! - validation planning ([`ValidationPlan`])
//! - domain set add/remove with rollback ([`DomainSetService`])
//! - validation with bounded polling ([`ValidationService`], [`ValidationPoller`])
//! - import identifier resolution ([`ImportResolver`])
//!
//! Every operation runs as one sequential async task and builds its own maps.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use akamai_domainownership_api::{EdgeGridClient, EdgeGridCredentials};
//! use akamai_domainownership_core::{
//!     PollConfig, ServiceContext, ValidationService, types::{ValidationScope, ValidationTarget},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = EdgeGridClient::new(EdgeGridCredentials::load(None, None)?)?;
//! let ctx = Arc::new(ServiceContext::new(Arc::new(client), PollConfig::default()));
//!
//! let state = ValidationService::new(ctx)
//!     .create(&[ValidationTarget::new("www.example.com", ValidationScope::Host)])
//!     .await?;
//! println!("{state:?}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, RollbackOutcome};
pub use services::{
    DomainLookup, DomainSetService, ImportResolver, PollConfig, ServiceContext, ValidationPlan,
    ValidationPoller, ValidationService,
};
