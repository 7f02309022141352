use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    AddDomainsRequest, AddDomainsResponse, DeleteDomainsRequest, InvalidateDomainsRequest,
    InvalidateDomainsResponse, SearchDomainsRequest, SearchDomainsResponse,
    ValidateDomainsRequest, ValidateDomainsResponse,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct RawApiError {
    /// HTTP 状态码
    pub status: u16,
    /// problem+json 中的 title
    pub title: Option<String>,
    /// problem+json 中的 detail，或者原始响应体
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            title: None,
            message: message.into(),
        }
    }
}

/// Domain Ownership API Trait
///
/// 五个 RPC 操作，对账引擎只依赖这个接口。
#[async_trait]
pub trait DomainOwnershipApi: Send + Sync {
    /// 按 (name, scope) 搜索域名
    ///
    /// 未找到的域名在响应中被静默省略，不算错误。
    async fn search_domains(&self, req: &SearchDomainsRequest) -> Result<SearchDomainsResponse>;

    /// 添加域名（逐域名部分成功）
    async fn add_domains(&self, req: &AddDomainsRequest) -> Result<AddDomainsResponse>;

    /// 删除域名（全有或全无）
    async fn delete_domains(&self, req: &DeleteDomainsRequest) -> Result<()>;

    /// 立即验证域名，单次最多 100 个
    async fn validate_domains(
        &self,
        req: &ValidateDomainsRequest,
    ) -> Result<ValidateDomainsResponse>;

    /// 撤销已验证的域名
    async fn invalidate_domains(
        &self,
        req: &InvalidateDomainsRequest,
    ) -> Result<InvalidateDomainsResponse>;
}
