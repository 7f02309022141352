//! 测试辅助模块
//!
//! 提供内存中的 `DomainOwnershipApi` mock 实现和便捷的测试工厂方法。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use akamai_domainownership_api::{
    AddDomainsRequest, AddDomainsResponse, ApiError, DeleteDomainsRequest, DomainError,
    DomainKey, DomainOwnershipApi, DomainRecord, DomainStatus, InvalidateDomainsRequest,
    InvalidateDomainsResponse, Result as ApiResult, SearchDomainsRequest, SearchDomainsResponse,
    ValidateDomainItem, ValidateDomainsRequest, ValidateDomainsResponse, ValidationLevel,
};

use crate::services::{PollConfig, ServiceContext};

// ===== MockCall =====

/// 记录下来的 API 调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Search {
        domains: Vec<DomainKey>,
        include_all: bool,
    },
    Add {
        domains: Vec<DomainKey>,
    },
    Delete {
        domains: Vec<DomainKey>,
    },
    Validate {
        domains: Vec<ValidateDomainItem>,
    },
    Invalidate {
        domains: Vec<DomainKey>,
    },
}

impl MockCall {
    /// 调用涉及的域名
    pub fn domains(&self) -> Vec<DomainKey> {
        match self {
            Self::Search { domains, .. }
            | Self::Add { domains }
            | Self::Delete { domains }
            | Self::Invalidate { domains } => domains.clone(),
            Self::Validate { domains } => domains.iter().map(ValidateDomainItem::key).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Op {
    Search,
    Add,
    Delete,
    Validate,
    Invalidate,
}

// ===== MockDomainOwnershipApi =====

pub struct MockDomainOwnershipApi {
    records: RwLock<BTreeMap<DomainKey, DomainRecord>>,
    /// search 时在精确记录之前额外返回的 ROOT/WILDCARD 级别记录
    parent_matches: RwLock<HashMap<DomainKey, DomainRecord>>,
    calls: RwLock<Vec<MockCall>>,
    /// 注入的整体调用失败
    failures: RwLock<HashMap<Op, ApiError>>,
    /// add 时逐域名拒绝：key → (title, detail)
    add_rejections: RwLock<HashMap<DomainKey, (String, String)>>,
    /// validate-now 后还需要多少次 search 才变为 VALIDATED
    polls_needed: RwLock<HashMap<DomainKey, u32>>,
    /// 当前剩余的 search 次数
    countdown: RwLock<HashMap<DomainKey, u32>>,
}

impl MockDomainOwnershipApi {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            parent_matches: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(HashMap::new()),
            add_rejections: RwLock::new(HashMap::new()),
            polls_needed: RwLock::new(HashMap::new()),
            countdown: RwLock::new(HashMap::new()),
        }
    }

    // ----- 数据准备 -----

    pub async fn insert(&self, record: DomainRecord) {
        self.records.write().await.insert(record.key(), record);
    }

    /// 让 search 额外返回一条父域名/通配符级别的记录
    pub async fn insert_parent_match(&self, key: &DomainKey, status: DomainStatus) {
        self.parent_matches
            .write()
            .await
            .insert(key.clone(), record(key, status, ValidationLevel::RootOrWildcard));
    }

    pub async fn contains(&self, key: &DomainKey) -> bool {
        self.records.read().await.contains_key(key)
    }

    pub async fn reject_on_add(&self, key: &DomainKey, title: &str, detail: &str) {
        self.add_rejections
            .write()
            .await
            .insert(key.clone(), (title.to_string(), detail.to_string()));
    }

    /// 域名保持 PENDING，直到被搜索 `polls` 次（validate-now 时重新计数）
    pub async fn validate_after_polls(&self, key: &DomainKey, polls: u32) {
        self.polls_needed.write().await.insert(key.clone(), polls);
        self.countdown.write().await.insert(key.clone(), polls);
    }

    pub async fn never_validate(&self, key: &DomainKey) {
        self.validate_after_polls(key, u32::MAX).await;
    }

    // ----- 故障注入 -----

    pub async fn fail_search(&self, err: ApiError) {
        self.failures.write().await.insert(Op::Search, err);
    }

    pub async fn fail_add(&self, err: ApiError) {
        self.failures.write().await.insert(Op::Add, err);
    }

    pub async fn fail_delete(&self, err: ApiError) {
        self.failures.write().await.insert(Op::Delete, err);
    }

    pub async fn fail_validate(&self, err: ApiError) {
        self.failures.write().await.insert(Op::Validate, err);
    }

    // ----- 调用记录 -----

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    async fn record_call(&self, op: Op, call: MockCall) -> ApiResult<()> {
        self.calls.write().await.push(call);
        match self.failures.read().await.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn set_status(
        records: &mut BTreeMap<DomainKey, DomainRecord>,
        key: &DomainKey,
        status: DomainStatus,
    ) {
        if let Some(r) = records.get_mut(key) {
            r.domain_status = status;
        }
    }
}

#[async_trait]
impl DomainOwnershipApi for MockDomainOwnershipApi {
    async fn search_domains(&self, req: &SearchDomainsRequest) -> ApiResult<SearchDomainsResponse> {
        self.record_call(
            Op::Search,
            MockCall::Search {
                domains: req.domains.clone(),
                include_all: req.include_all,
            },
        )
        .await?;

        let mut records = self.records.write().await;
        let mut countdown = self.countdown.write().await;
        let parents = self.parent_matches.read().await;
        let mut found = Vec::new();
        for key in &req.domains {
            if let Some(parent) = parents.get(key) {
                found.push(parent.clone());
            }
            if let Some(left) = countdown.get_mut(key) {
                *left = left.saturating_sub(1);
                if *left == 0 {
                    countdown.remove(key);
                    Self::set_status(&mut records, key, DomainStatus::Validated);
                }
            }
            if let Some(r) = records.get(key) {
                found.push(r.clone());
            }
        }
        Ok(SearchDomainsResponse { domains: found })
    }

    async fn add_domains(&self, req: &AddDomainsRequest) -> ApiResult<AddDomainsResponse> {
        self.record_call(
            Op::Add,
            MockCall::Add {
                domains: req.domains.clone(),
            },
        )
        .await?;

        let rejections = self.add_rejections.read().await;
        let mut records = self.records.write().await;
        let mut response = AddDomainsResponse::default();
        for key in &req.domains {
            if let Some((title, detail)) = rejections.get(key) {
                response.errors.push(DomainError {
                    domain_name: key.domain_name.clone(),
                    validation_scope: key.validation_scope,
                    title: title.clone(),
                    detail: detail.clone(),
                });
                continue;
            }
            let added = record(key, DomainStatus::RequestAccepted, ValidationLevel::Fqdn);
            records.insert(key.clone(), added.clone());
            response.successes.push(added);
        }
        Ok(response)
    }

    async fn delete_domains(&self, req: &DeleteDomainsRequest) -> ApiResult<()> {
        self.record_call(
            Op::Delete,
            MockCall::Delete {
                domains: req.domains.clone(),
            },
        )
        .await?;

        let mut records = self.records.write().await;
        for key in &req.domains {
            records.remove(key);
        }
        Ok(())
    }

    async fn validate_domains(
        &self,
        req: &ValidateDomainsRequest,
    ) -> ApiResult<ValidateDomainsResponse> {
        self.record_call(
            Op::Validate,
            MockCall::Validate {
                domains: req.domains.clone(),
            },
        )
        .await?;

        let mut records = self.records.write().await;
        let mut countdown = self.countdown.write().await;
        let polls_needed = self.polls_needed.read().await;
        let mut response = ValidateDomainsResponse::default();
        for item in &req.domains {
            let key = item.key();
            let Some(r) = records.get_mut(&key) else {
                continue;
            };
            if let Some(polls) = polls_needed.get(&key) {
                r.domain_status = DomainStatus::Pending;
                countdown.insert(key, *polls);
            } else {
                r.domain_status = DomainStatus::Validated;
            }
            if item.validation_method.is_some() {
                r.validation_method = item.validation_method;
            }
            response.domains.push(r.clone());
        }
        Ok(response)
    }

    async fn invalidate_domains(
        &self,
        req: &InvalidateDomainsRequest,
    ) -> ApiResult<InvalidateDomainsResponse> {
        self.record_call(
            Op::Invalidate,
            MockCall::Invalidate {
                domains: req.domains.clone(),
            },
        )
        .await?;

        let mut records = self.records.write().await;
        let mut response = InvalidateDomainsResponse::default();
        for key in &req.domains {
            Self::set_status(&mut records, key, DomainStatus::Invalidated);
            if let Some(r) = records.get(key) {
                response.domains.push(r.clone());
            }
        }
        Ok(response)
    }
}

// ===== 工厂方法 =====

/// 构造一条 API 域名记录
pub fn record(key: &DomainKey, status: DomainStatus, level: ValidationLevel) -> DomainRecord {
    DomainRecord {
        domain_name: key.domain_name.clone(),
        validation_scope: key.validation_scope,
        account_id: Some("act_test".to_string()),
        domain_status: status,
        validation_level: Some(level),
        validation_method: None,
        validation_requested_by: None,
        validation_requested_date: None,
        validation_completed_date: None,
        validation_challenge: None,
    }
}

/// 创建测试用 `ServiceContext`（快速轮询）
pub fn create_test_context() -> (Arc<ServiceContext>, Arc<MockDomainOwnershipApi>) {
    create_test_context_with(PollConfig::new(
        Duration::from_millis(5),
        Duration::from_secs(2),
    ))
}

/// 创建使用指定轮询配置的 `ServiceContext`
pub fn create_test_context_with(
    poll_config: PollConfig,
) -> (Arc<ServiceContext>, Arc<MockDomainOwnershipApi>) {
    let api = Arc::new(MockDomainOwnershipApi::new());
    let ctx = Arc::new(ServiceContext::new(api.clone(), poll_config));
    (ctx, api)
}
