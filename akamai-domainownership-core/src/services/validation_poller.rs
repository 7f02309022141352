//! Validation poller
//!
//! After `validate-now`, domains not yet `VALIDATED` are searched again at a
//! fixed interval until every one of them is `VALIDATED` or the deadline
//! passes. The deadline is the only way the loop ends early.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use akamai_domainownership_api::{
    DomainKey, DomainRecord, DomainStatus, MAX_VALIDATE_DOMAINS, ValidationLevel,
};

use crate::error::{CoreError, CoreResult};
use crate::services::domain_lookup::index_records;
use crate::services::{DomainLookup, ServiceContext};

/// Default interval between two status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Default time allowed for all submitted domains to become `VALIDATED`.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Poll timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollConfig {
    #[must_use]
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT)
    }
}

pub struct ValidationPoller {
    lookup: DomainLookup,
    config: PollConfig,
}

impl ValidationPoller {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, config: PollConfig) -> Self {
        Self {
            lookup: DomainLookup::new(ctx),
            config,
        }
    }

    /// Waits until every submitted domain reports `VALIDATED`.
    ///
    /// `submitted` is the validate-now response; domains already `VALIDATED`
    /// there are never polled.
    pub async fn wait_until_validated(&self, submitted: &[DomainRecord]) -> CoreResult<()> {
        let mut pending: BTreeMap<DomainKey, DomainStatus> = submitted
            .iter()
            .filter(|r| r.domain_status != DomainStatus::Validated)
            .map(|r| (r.key(), r.domain_status))
            .collect();

        if pending.is_empty() {
            return Ok(());
        }

        log::info!(
            "Waiting for {} domains to be validated (interval {:?}, timeout {:?})",
            pending.len(),
            self.config.interval,
            self.config.timeout
        );
        let deadline = Instant::now() + self.config.timeout;

        while !pending.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                let pending: Vec<DomainKey> = pending.into_keys().collect();
                log::warn!(
                    "Domain validation timed out with {} domains pending",
                    pending.len()
                );
                return Err(CoreError::ValidationTimeout { pending });
            }
            tokio::time::sleep(self.config.interval.min(deadline - now)).await;

            let keys: Vec<DomainKey> = pending.keys().cloned().collect();
            let records = index_records(
                self.lookup
                    .search_in_chunks(&keys, true, MAX_VALIDATE_DOMAINS)
                    .await?,
            );

            for (key, record) in records {
                let Some(previous) = pending.get(&key).copied() else {
                    continue;
                };
                // a parent or wildcard match says nothing about the domain itself
                if record.level() == ValidationLevel::RootOrWildcard {
                    log::debug!("Domain {key} only matched at {} level", record.level());
                    continue;
                }
                let status = record.domain_status;
                if status == DomainStatus::Validated {
                    log::info!("Domain {key} validated");
                    pending.remove(&key);
                } else if status != previous {
                    if status.is_terminal() {
                        log::warn!("Domain {key} moved to {status}, it will not validate on its own");
                    } else {
                        log::debug!("Domain {key}: {previous} -> {status}");
                    }
                    pending.insert(key, status);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockCall, create_test_context_with, record};
    use akamai_domainownership_api::ValidationScope;

    fn fast() -> PollConfig {
        PollConfig::new(Duration::from_millis(5), Duration::from_millis(200))
    }

    fn pending_record(name: &str) -> DomainRecord {
        record(
            &DomainKey::new(name, ValidationScope::Host),
            DomainStatus::Pending,
            ValidationLevel::Fqdn,
        )
    }

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.timeout, Duration::from_secs(1800));
    }

    #[tokio::test]
    async fn test_already_validated_is_not_polled() {
        let (ctx, api) = create_test_context_with(fast());
        let poller = ValidationPoller::new(ctx, fast());

        let mut validated = pending_record("a.example.com");
        validated.domain_status = DomainStatus::Validated;
        poller.wait_until_validated(&[validated]).await.unwrap();
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_polls_until_validated() {
        let (ctx, api) = create_test_context_with(fast());
        let submitted = pending_record("a.example.com");
        api.insert(submitted.clone()).await;
        api.validate_after_polls(&submitted.key(), 3).await;

        let poller = ValidationPoller::new(ctx, fast());
        poller.wait_until_validated(&[submitted]).await.unwrap();

        let searches = api
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, MockCall::Search { .. }))
            .count();
        assert_eq!(searches, 3);
    }

    #[tokio::test]
    async fn test_timeout() {
        let (ctx, api) = create_test_context_with(fast());
        let submitted = pending_record("slow.example.com");
        api.insert(submitted.clone()).await;

        let poller = ValidationPoller::new(ctx, fast());
        let err = poller.wait_until_validated(&[submitted.clone()]).await.unwrap_err();

        assert!(
            err.to_string()
                .starts_with("Timeout while waiting for domain validation")
        );
        assert!(matches!(err, CoreError::ValidationTimeout { ref pending } if pending == &vec![submitted.key()]));
        assert!(!api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_pending_over_limit_is_rechunked() {
        let (ctx, api) = create_test_context_with(fast());
        let submitted: Vec<DomainRecord> = (0..150)
            .map(|i| pending_record(&format!("d{i:03}.example.com")))
            .collect();
        for r in &submitted {
            api.insert(r.clone()).await;
            api.validate_after_polls(&r.key(), 1).await;
        }

        let poller = ValidationPoller::new(ctx, fast());
        poller.wait_until_validated(&submitted).await.unwrap();

        let sizes: Vec<usize> = api
            .calls()
            .await
            .iter()
            .map(|c| c.domains().len())
            .collect();
        assert_eq!(sizes, vec![100, 50]);
    }

    #[tokio::test]
    async fn test_validated_parent_does_not_end_polling() {
        let config = PollConfig::new(Duration::from_millis(5), Duration::from_millis(100));
        let (ctx, api) = create_test_context_with(config);
        let submitted = pending_record("www.example.com");
        api.insert(submitted.clone()).await;
        api.never_validate(&submitted.key()).await;
        api.insert_parent_match(&submitted.key(), DomainStatus::Validated)
            .await;

        let poller = ValidationPoller::new(ctx, config);
        let err = poller.wait_until_validated(&[submitted.clone()]).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::ValidationTimeout { ref pending } if pending == &vec![submitted.key()]
        ));
    }

    #[tokio::test]
    async fn test_exact_match_validates_alongside_parent() {
        let (ctx, api) = create_test_context_with(fast());
        let submitted = pending_record("www.example.com");
        api.insert(submitted.clone()).await;
        api.validate_after_polls(&submitted.key(), 2).await;
        api.insert_parent_match(&submitted.key(), DomainStatus::Validated)
            .await;

        let poller = ValidationPoller::new(ctx, fast());
        poller.wait_until_validated(&[submitted]).await.unwrap();

        let searches = api
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, MockCall::Search { .. }))
            .count();
        assert_eq!(searches, 2);
    }

    #[tokio::test]
    async fn test_terminal_status_keeps_polling_until_deadline() {
        let (ctx, api) = create_test_context_with(fast());
        let mut expired = pending_record("expired.example.com");
        expired.domain_status = DomainStatus::TokenExpired;
        api.insert(expired.clone()).await;

        let poller = ValidationPoller::new(ctx, fast());
        let err = poller
            .wait_until_validated(&[pending_record("expired.example.com")])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationTimeout { .. }));
    }
}
