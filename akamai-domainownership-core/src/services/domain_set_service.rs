//! 域名集合服务（domains 资源的 create / read / update / delete / import）

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use akamai_domainownership_api::{
    AddDomainsRequest, DeleteDomainsRequest, DomainKey, DomainRecord, DomainStatus,
    ValidationLevel,
};

use crate::error::{CoreError, CoreResult, RollbackOutcome};
use crate::services::{
    DomainLookup, ImportResolver, ServiceContext, build_invalidate_request, ensure_unique,
    log_error,
};
use crate::types::{DomainState, DomainsState};

/// 域名集合服务
pub struct DomainSetService {
    ctx: Arc<ServiceContext>,
    lookup: DomainLookup,
}

impl DomainSetService {
    /// 创建服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            lookup: DomainLookup::new(Arc::clone(&ctx)),
            ctx,
        }
    }

    // ===== 资源生命周期 =====

    /// 添加目标域名并返回刷新后的状态
    pub async fn create(&self, target: &[DomainKey]) -> CoreResult<DomainsState> {
        ensure_unique(target)?;
        log::info!("Creating domain set with {} domains", target.len());

        self.add_domains(target)
            .await
            .inspect_err(|e| log_error("Create domains", e))?;
        self.refresh(target).await
    }

    /// 刷新状态；API 中已不存在的域名从状态中移除
    pub async fn read(&self, state: &DomainsState) -> CoreResult<DomainsState> {
        self.refresh(&state.keys()).await
    }

    /// 先添加 `target \ state`，再移除 `state \ target`
    pub async fn update(
        &self,
        state: &DomainsState,
        target: &[DomainKey],
    ) -> CoreResult<DomainsState> {
        ensure_unique(target)?;

        let current: HashSet<DomainKey> = state.keys().into_iter().collect();
        let wanted: HashSet<&DomainKey> = target.iter().collect();

        let mut to_add: Vec<DomainKey> = target
            .iter()
            .filter(|k| !current.contains(*k))
            .cloned()
            .collect();
        to_add.sort();
        let mut to_remove: Vec<DomainKey> = current
            .iter()
            .filter(|k| !wanted.contains(k))
            .cloned()
            .collect();
        to_remove.sort();

        log::info!(
            "Updating domain set: {} to add, {} to remove",
            to_add.len(),
            to_remove.len()
        );

        self.add_domains(&to_add)
            .await
            .inspect_err(|e| log_error("Update domains", e))?;
        self.remove_domains(&to_remove)
            .await
            .inspect_err(|e| log_error("Update domains", e))?;
        self.refresh(target).await
    }

    /// 移除状态中的所有域名
    pub async fn delete(&self, state: &DomainsState) -> CoreResult<()> {
        let mut keys = state.keys();
        keys.sort();
        log::info!("Deleting domain set with {} domains", keys.len());
        self.remove_domains(&keys)
            .await
            .inspect_err(|e| log_error("Delete domains", e))
    }

    /// 按导入 ID 解析域名并生成状态
    pub async fn import(&self, import_id: &str) -> CoreResult<DomainsState> {
        let records = ImportResolver::new(Arc::clone(&self.ctx))
            .resolve(import_id)
            .await
            .inspect_err(|e| log_error("Import domains", e))?;
        Ok(build_state(records))
    }

    // ===== 对账步骤 =====

    /// 添加尚不存在的域名；任一域名失败则回滚本次已添加的域名
    pub async fn add_domains(&self, keys: &[DomainKey]) -> CoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let existing = self.lookup.fetch_records(keys).await?;

        let mut sorted: Vec<&DomainKey> = keys.iter().collect();
        sorted.sort();
        let mut missing = Vec::new();
        for key in sorted {
            match existing.get(key) {
                Some(record)
                    if record.domain_status == DomainStatus::Validated
                        && record.level() != ValidationLevel::Fqdn =>
                {
                    return Err(CoreError::AlreadyValidatedByParent {
                        domain_name: key.domain_name.clone(),
                        validation_scope: key.validation_scope,
                    });
                }
                Some(record) => {
                    log::debug!("Domain {key} already exists ({})", record.domain_status);
                }
                None => missing.push(key.clone()),
            }
        }

        if missing.is_empty() {
            log::debug!("All {} domains already exist", keys.len());
            return Ok(());
        }

        let response = self
            .ctx
            .api
            .add_domains(&AddDomainsRequest { domains: missing })
            .await
            .map_err(CoreError::api("add domains"))?;

        if response.errors.is_empty() {
            log::info!("Added {} domains", response.successes.len());
            return Ok(());
        }

        let rejected: Vec<String> = response
            .errors
            .iter()
            .map(|e| e.key().to_string())
            .collect();
        log::warn!(
            "Add domains rejected [{}], rolling back {} added domains",
            rejected.join(", "),
            response.successes.len()
        );
        let rollback = self.rollback(&response.successes).await;
        Err(CoreError::AddDomainsFailed {
            errors: response.errors,
            rollback,
        })
    }

    /// 删除本次添加成功的域名（只尝试一次）
    async fn rollback(&self, added: &[DomainRecord]) -> RollbackOutcome {
        if added.is_empty() {
            return RollbackOutcome::NothingAdded;
        }
        let request = DeleteDomainsRequest {
            domains: added.iter().map(DomainRecord::key).collect(),
        };
        match self.ctx.api.delete_domains(&request).await {
            Ok(()) => RollbackOutcome::Successful,
            Err(e) => {
                log::error!("Rollback of added domains failed: {e}");
                RollbackOutcome::Failed(e)
            }
        }
    }

    /// 先撤销仍为 VALIDATED 的域名，再删除全部域名
    pub async fn remove_domains(&self, keys: &[DomainKey]) -> CoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let current = self.lookup.fetch_domain_map(keys).await?;
        let validated: HashSet<DomainKey> = keys
            .iter()
            .filter(|k| {
                current
                    .get(*k)
                    .is_some_and(|d| d.validation_status == DomainStatus::Validated)
            })
            .cloned()
            .collect();

        if let Some(request) = build_invalidate_request(&validated) {
            log::info!("Invalidating {} domains before delete", request.domains.len());
            self.ctx
                .api
                .invalidate_domains(&request)
                .await
                .map_err(CoreError::api("invalidate domains"))?;
        }

        self.ctx
            .api
            .delete_domains(&DeleteDomainsRequest {
                domains: keys.to_vec(),
            })
            .await
            .map_err(CoreError::api("delete domains"))?;
        log::info!("Deleted {} domains", keys.len());
        Ok(())
    }

    /// 重新搜索并生成状态
    async fn refresh(&self, keys: &[DomainKey]) -> CoreResult<DomainsState> {
        let mut found = self.lookup.fetch_records(keys).await?;
        let records: Vec<DomainRecord> = keys
            .iter()
            .filter_map(|key| {
                let record = found.remove(key);
                if record.is_none() {
                    log::warn!("Domain {key} no longer exists, removing from state");
                }
                record
            })
            .collect();
        Ok(build_state(records))
    }
}

fn build_state(records: Vec<DomainRecord>) -> DomainsState {
    let mut by_key: HashMap<DomainKey, DomainState> = HashMap::new();
    for record in records {
        by_key.insert(record.key(), DomainState::from(record));
    }
    let mut domains: Vec<DomainState> = by_key.into_values().collect();
    domains.sort_by_key(DomainState::key);
    DomainsState { domains }
}
