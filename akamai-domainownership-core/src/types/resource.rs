//! 资源状态类型定义
//!
//! 每个资源操作的输入与输出，字段与持久化到 Terraform state 中的属性一一对应。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use akamai_domainownership_api::{
    DomainKey, DomainRecord, DomainStatus, ValidationChallenge, ValidationMethod, ValidationScope,
};

// ============ Domains 资源 ============

/// Domains 资源中的单个域名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainState {
    pub domain_name: String,
    pub validation_scope: ValidationScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub domain_status: DomainStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_method: Option<ValidationMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_requested_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_requested_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_completed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_challenge: Option<ValidationChallenge>,
}

impl DomainState {
    pub fn key(&self) -> DomainKey {
        DomainKey::new(self.domain_name.clone(), self.validation_scope)
    }
}

impl From<DomainRecord> for DomainState {
    fn from(record: DomainRecord) -> Self {
        Self {
            domain_name: record.domain_name,
            validation_scope: record.validation_scope,
            account_id: record.account_id,
            domain_status: record.domain_status,
            validation_method: record.validation_method,
            validation_requested_by: record.validation_requested_by,
            validation_requested_date: record.validation_requested_date,
            validation_completed_date: record.validation_completed_date,
            validation_challenge: record.validation_challenge,
        }
    }
}

/// Domains 资源状态（按 `DomainKey` 排序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainsState {
    pub domains: Vec<DomainState>,
}

impl DomainsState {
    pub fn keys(&self) -> Vec<DomainKey> {
        self.domains.iter().map(DomainState::key).collect()
    }
}

// ============ Validation 资源 ============

/// 期望验证的域名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationTarget {
    pub domain_name: String,
    pub validation_scope: ValidationScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_method: Option<ValidationMethod>,
}

impl ValidationTarget {
    pub fn new(domain_name: impl Into<String>, validation_scope: ValidationScope) -> Self {
        Self {
            domain_name: domain_name.into(),
            validation_scope,
            validation_method: None,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: ValidationMethod) -> Self {
        self.validation_method = Some(method);
        self
    }

    pub fn key(&self) -> DomainKey {
        DomainKey::new(self.domain_name.clone(), self.validation_scope)
    }
}

/// Validation 资源中的单个域名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub domain_name: String,
    pub validation_scope: ValidationScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_method: Option<ValidationMethod>,
    pub domain_status: DomainStatus,
}

impl ValidationEntry {
    pub fn key(&self) -> DomainKey {
        DomainKey::new(self.domain_name.clone(), self.validation_scope)
    }
}

/// Validation 资源状态（按 `DomainKey` 排序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationState {
    pub domains: Vec<ValidationEntry>,
}

impl ValidationState {
    pub fn keys(&self) -> Vec<DomainKey> {
        self.domains.iter().map(ValidationEntry::key).collect()
    }
}
