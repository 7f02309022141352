//! 业务逻辑服务层

mod domain_lookup;
mod domain_set_service;
mod import_resolver;
mod validation_plan;
mod validation_poller;
mod validation_service;

pub use domain_lookup::DomainLookup;
pub use domain_set_service::DomainSetService;
pub use import_resolver::{ImportEntry, ImportResolver, MAX_IMPORT_DOMAINS, parse_import_id};
pub use validation_plan::{
    ValidationPlan, build_invalidate_request, build_validate_requests,
    calculate_domains_to_invalidate, calculate_domains_to_validate,
};
pub use validation_poller::{PollConfig, ValidationPoller};
pub use validation_service::ValidationService;

use std::collections::HashSet;
use std::sync::Arc;

use akamai_domainownership_api::{DomainKey, DomainOwnershipApi};

use crate::error::{CoreError, CoreResult};

/// 服务上下文 - 持有所有依赖
///
/// 调用方注入 API 实现（生产环境为 `EdgeGridClient`）以及轮询配置。
pub struct ServiceContext {
    /// Domain Ownership API
    pub api: Arc<dyn DomainOwnershipApi>,
    /// 验证轮询配置
    pub poll_config: PollConfig,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(api: Arc<dyn DomainOwnershipApi>, poll_config: PollConfig) -> Self {
        Self { api, poll_config }
    }
}

/// 配置中的域名不允许重复
pub(crate) fn ensure_unique<'a>(keys: impl IntoIterator<Item = &'a DomainKey>) -> CoreResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CoreError::DuplicateDomain(key.clone()));
        }
    }
    Ok(())
}

/// 记录错误日志（预期错误用 warn）
pub(crate) fn log_error(operation: &str, err: &CoreError) {
    if err.is_expected() {
        log::warn!("{operation} failed: {err}");
    } else {
        log::error!("{operation} failed: {err}");
    }
}
