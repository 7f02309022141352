//! 域名验证服务（validation 资源的 create / read / update / delete / import）

use std::collections::HashMap;
use std::sync::Arc;

use akamai_domainownership_api::{DomainKey, DomainRecord, ValidationLevel};

use crate::error::{CoreError, CoreResult};
use crate::services::{
    DomainLookup, ImportResolver, ServiceContext, ValidationPlan, ValidationPoller,
    ensure_unique, log_error,
};
use crate::types::{
    DomainDetails, DomainMap, PlanMap, ValidationEntry, ValidationState, ValidationTarget,
};

/// 域名验证服务
pub struct ValidationService {
    ctx: Arc<ServiceContext>,
    lookup: DomainLookup,
    poller: ValidationPoller,
}

impl ValidationService {
    /// 创建服务实例（轮询配置取自 `ServiceContext`）
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            lookup: DomainLookup::new(Arc::clone(&ctx)),
            poller: ValidationPoller::new(Arc::clone(&ctx), ctx.poll_config),
            ctx,
        }
    }

    /// 验证目标域名，等待全部 VALIDATED 后返回状态
    pub async fn create(&self, targets: &[ValidationTarget]) -> CoreResult<ValidationState> {
        self.reconcile(&DomainMap::new(), targets)
            .await
            .inspect_err(|e| log_error("Create validation", e))?;
        self.refresh(targets).await
    }

    /// 刷新状态；API 中已不存在的域名从状态中移除
    pub async fn read(&self, state: &ValidationState) -> CoreResult<ValidationState> {
        let targets: Vec<ValidationTarget> = state.domains.iter().map(target_of).collect();
        self.refresh(&targets).await
    }

    /// 先撤销被移出的已验证域名，再验证其余域名
    pub async fn update(
        &self,
        state: &ValidationState,
        targets: &[ValidationTarget],
    ) -> CoreResult<ValidationState> {
        let state_map: DomainMap = state
            .domains
            .iter()
            .map(|e| {
                let mut details = DomainDetails::new(e.domain_status, ValidationLevel::Fqdn);
                details.validation_method = e.validation_method;
                (e.key(), details)
            })
            .collect();

        self.reconcile(&state_map, targets)
            .await
            .inspect_err(|e| log_error("Update validation", e))?;
        self.refresh(targets).await
    }

    /// 撤销状态中仍为 VALIDATED 的域名
    pub async fn delete(&self, state: &ValidationState) -> CoreResult<()> {
        let keys = state.keys();
        let api = self.lookup.fetch_domain_map(&keys).await?;
        let state_map: DomainMap = keys
            .into_iter()
            .filter_map(|k| api.get(&k).map(|d| (k, *d)))
            .collect();

        let plan = ValidationPlan::compute(&api, &state_map, &PlanMap::new())?;
        match plan.invalidate_request() {
            Some(request) => {
                log::info!("Invalidating {} domains", request.domains.len());
                self.ctx
                    .api
                    .invalidate_domains(&request)
                    .await
                    .map_err(CoreError::api("invalidate domains"))
                    .inspect_err(|e| log_error("Delete validation", e))?;
            }
            None => log::info!("No validated domain left to invalidate"),
        }
        Ok(())
    }

    /// 按导入 ID 解析域名；状态中的验证方式取自 API
    pub async fn import(&self, import_id: &str) -> CoreResult<ValidationState> {
        let records = ImportResolver::new(Arc::clone(&self.ctx))
            .resolve(import_id)
            .await
            .inspect_err(|e| log_error("Import validation", e))?;
        let mut domains: Vec<ValidationEntry> = records
            .into_iter()
            .map(|r| ValidationEntry {
                domain_name: r.domain_name,
                validation_scope: r.validation_scope,
                validation_method: r.validation_method,
                domain_status: r.domain_status,
            })
            .collect();
        domains.sort_by_key(ValidationEntry::key);
        Ok(ValidationState { domains })
    }

    // ===== 对账步骤 =====

    async fn reconcile(&self, state: &DomainMap, targets: &[ValidationTarget]) -> CoreResult<()> {
        let plan_map = plan_map(targets)?;

        let mut keys: Vec<DomainKey> = plan_map.keys().cloned().collect();
        keys.extend(state.keys().filter(|k| !plan_map.contains_key(*k)).cloned());
        keys.sort();
        let api = self.lookup.fetch_domain_map(&keys).await?;

        let plan = ValidationPlan::compute(&api, state, &plan_map)?;
        if plan.is_empty() {
            log::info!("All domains already converged");
            return Ok(());
        }
        self.apply(&plan).await
    }

    /// 撤销 → 分批验证 → 轮询
    async fn apply(&self, plan: &ValidationPlan) -> CoreResult<()> {
        if let Some(request) = plan.invalidate_request() {
            log::info!("Invalidating {} domains", request.domains.len());
            self.ctx
                .api
                .invalidate_domains(&request)
                .await
                .map_err(CoreError::api("invalidate domains"))?;
        }

        let requests = plan.validate_requests();
        if requests.is_empty() {
            return Ok(());
        }

        let mut submitted: Vec<DomainRecord> = Vec::with_capacity(plan.to_validate.len());
        for request in &requests {
            log::info!("Validating {} domains", request.domains.len());
            let response = self
                .ctx
                .api
                .validate_domains(request)
                .await
                .map_err(CoreError::api("validate domains"))?;
            submitted.extend(response.domains);
        }

        self.poller.wait_until_validated(&submitted).await
    }

    async fn refresh(&self, targets: &[ValidationTarget]) -> CoreResult<ValidationState> {
        let keys: Vec<DomainKey> = targets.iter().map(ValidationTarget::key).collect();
        let api = self.lookup.fetch_domain_map(&keys).await?;

        let mut by_key: HashMap<DomainKey, ValidationEntry> = HashMap::new();
        for target in targets {
            let key = target.key();
            let Some(details) = api.get(&key) else {
                log::warn!("Domain {key} no longer exists, removing from state");
                continue;
            };
            by_key.insert(
                key,
                ValidationEntry {
                    domain_name: target.domain_name.clone(),
                    validation_scope: target.validation_scope,
                    validation_method: target.validation_method,
                    domain_status: details.validation_status,
                },
            );
        }

        let mut domains: Vec<ValidationEntry> = by_key.into_values().collect();
        domains.sort_by_key(ValidationEntry::key);
        Ok(ValidationState { domains })
    }
}

fn plan_map(targets: &[ValidationTarget]) -> CoreResult<PlanMap> {
    let keys: Vec<DomainKey> = targets.iter().map(ValidationTarget::key).collect();
    ensure_unique(&keys)?;
    Ok(targets
        .iter()
        .map(|t| (t.key(), t.validation_method))
        .collect())
}

fn target_of(entry: &ValidationEntry) -> ValidationTarget {
    ValidationTarget {
        domain_name: entry.domain_name.clone(),
        validation_scope: entry.validation_scope,
        validation_method: entry.validation_method,
    }
}
