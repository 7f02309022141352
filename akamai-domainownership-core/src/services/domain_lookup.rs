//! 域名查询服务（SearchDomains 分批封装）

use std::collections::HashMap;
use std::sync::Arc;

use akamai_domainownership_api::{
    DomainKey, DomainRecord, MAX_SEARCH_DOMAINS, SearchDomainsRequest, ValidationLevel,
};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{DomainDetails, DomainMap};

/// 域名查询服务
pub struct DomainLookup {
    ctx: Arc<ServiceContext>,
}

impl DomainLookup {
    /// 创建查询服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 搜索域名，每批最多 1000 个，结果按请求顺序拼接
    ///
    /// 响应中缺失的域名被视为不存在。
    pub async fn search(
        &self,
        keys: &[DomainKey],
        include_all: bool,
    ) -> CoreResult<Vec<DomainRecord>> {
        self.search_in_chunks(keys, include_all, MAX_SEARCH_DOMAINS)
            .await
    }

    /// 按指定批大小搜索
    pub(crate) async fn search_in_chunks(
        &self,
        keys: &[DomainKey],
        include_all: bool,
        chunk_size: usize,
    ) -> CoreResult<Vec<DomainRecord>> {
        let mut records = Vec::new();
        for chunk in keys.chunks(chunk_size.max(1)) {
            let request = SearchDomainsRequest {
                include_all,
                domains: chunk.to_vec(),
            };
            let response = self
                .ctx
                .api
                .search_domains(&request)
                .await
                .map_err(CoreError::api("search domains"))?;
            log::debug!(
                "Search returned {} of {} requested domains",
                response.domains.len(),
                chunk.len()
            );
            records.extend(response.domains);
        }
        Ok(records)
    }

    /// 搜索（includeAll=true）并按 `DomainKey` 建立记录映射
    pub async fn fetch_records(
        &self,
        keys: &[DomainKey],
    ) -> CoreResult<HashMap<DomainKey, DomainRecord>> {
        let records = self.search(keys, true).await?;
        Ok(index_records(records))
    }

    /// 搜索并构建 `apiDomains` 映射
    pub async fn fetch_domain_map(&self, keys: &[DomainKey]) -> CoreResult<DomainMap> {
        let records = self.fetch_records(keys).await?;
        Ok(records
            .iter()
            .map(|(key, record)| (key.clone(), DomainDetails::from(record)))
            .collect())
    }
}

/// 同一 key 出现多条记录时保留 FQDN 级别的那条
pub(crate) fn index_records(records: Vec<DomainRecord>) -> HashMap<DomainKey, DomainRecord> {
    let mut map: HashMap<DomainKey, DomainRecord> = HashMap::with_capacity(records.len());
    for record in records {
        let key = record.key();
        match map.get(&key) {
            Some(existing) if existing.level() == ValidationLevel::Fqdn => {}
            _ => {
                map.insert(key, record);
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockCall, create_test_context, record};
    use akamai_domainownership_api::{ApiError, DomainStatus, ValidationScope};

    fn keys(n: usize) -> Vec<DomainKey> {
        (0..n)
            .map(|i| DomainKey::new(format!("d{i:04}.example.com"), ValidationScope::Host))
            .collect()
    }

    #[tokio::test]
    async fn test_search_chunks_at_page_limit() {
        let (ctx, api) = create_test_context();
        let lookup = DomainLookup::new(ctx);

        for (n, expected_calls) in [(150, 1), (1000, 1), (1001, 2)] {
            api.clear_calls().await;
            let requested = keys(n);
            lookup.search(&requested, true).await.unwrap();

            let calls = api.calls().await;
            assert_eq!(calls.len(), expected_calls, "n = {n}");
            let mut union = Vec::new();
            for call in calls {
                let MockCall::Search { domains, include_all } = call else {
                    panic!("expected only search calls");
                };
                assert!(include_all);
                assert!(!domains.is_empty());
                union.extend(domains);
            }
            assert_eq!(union, requested);
        }
    }

    #[tokio::test]
    async fn test_poll_sized_chunks() {
        let (ctx, api) = create_test_context();
        let lookup = DomainLookup::new(ctx);

        lookup.search_in_chunks(&keys(150), true, 100).await.unwrap();
        let sizes: Vec<usize> = api
            .calls()
            .await
            .into_iter()
            .map(|c| c.domains().len())
            .collect();
        assert_eq!(sizes, vec![100, 50]);
    }

    #[tokio::test]
    async fn test_missing_domains_are_omitted() {
        let (ctx, api) = create_test_context();
        let present = DomainKey::new("a.example.com", ValidationScope::Host);
        api.insert(record(&present, DomainStatus::Pending, ValidationLevel::Fqdn))
            .await;

        let lookup = DomainLookup::new(ctx);
        let map = lookup
            .fetch_domain_map(&[
                present.clone(),
                DomainKey::new("b.example.com", ValidationScope::Host),
            ])
            .await
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&present].validation_status, DomainStatus::Pending);
    }

    #[tokio::test]
    async fn test_api_error_is_wrapped() {
        let (ctx, api) = create_test_context();
        api.fail_search(ApiError::Timeout {
            detail: "slow".to_string(),
        })
        .await;

        let lookup = DomainLookup::new(ctx);
        let err = lookup.search(&keys(1), false).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Api { operation: "search domains", source: ApiError::Timeout { .. } }
        ));
    }

    #[test]
    fn test_index_prefers_fqdn() {
        let key = DomainKey::new("a.example.com", ValidationScope::Host);
        let fqdn = record(&key, DomainStatus::Pending, ValidationLevel::Fqdn);
        let wildcard = record(&key, DomainStatus::Validated, ValidationLevel::RootOrWildcard);

        let map = index_records(vec![fqdn.clone(), wildcard.clone()]);
        assert_eq!(map[&key], fqdn);
        let map = index_records(vec![wildcard, fqdn.clone()]);
        assert_eq!(map[&key], fqdn);
    }
}
