//! `DomainOwnershipApi` trait 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::{ApiError, Result};
use crate::traits::DomainOwnershipApi;
use crate::types::{
    AddDomainsRequest, AddDomainsResponse, DeleteDomainsRequest, InvalidateDomainsRequest,
    InvalidateDomainsResponse, MAX_SEARCH_DOMAINS, MAX_VALIDATE_DOMAINS, SearchDomainsRequest,
    SearchDomainsResponse, ValidateDomainsRequest, ValidateDomainsResponse,
};

use super::{DOMAINS_PATH, EdgeGridClient};

/// 请求域名数量超出 API 上限时在本地拒绝
fn ensure_within_limit(operation: &str, count: usize, limit: usize) -> Result<()> {
    if count > limit {
        return Err(ApiError::InvalidRequest {
            title: format!("Too many domains for {operation}"),
            detail: format!("{count} domains requested, the API accepts at most {limit}"),
        });
    }
    Ok(())
}

#[async_trait]
impl DomainOwnershipApi for EdgeGridClient {
    async fn search_domains(&self, req: &SearchDomainsRequest) -> Result<SearchDomainsResponse> {
        ensure_within_limit("search", req.domains.len(), MAX_SEARCH_DOMAINS)?;
        log::debug!(
            "Searching {} domains (includeAll={})",
            req.domains.len(),
            req.include_all
        );
        self.request_json(
            Method::POST,
            &format!("{DOMAINS_PATH}/search"),
            &[("includeAll", req.include_all.to_string())],
            req,
        )
        .await
    }

    async fn add_domains(&self, req: &AddDomainsRequest) -> Result<AddDomainsResponse> {
        log::debug!("Adding {} domains", req.domains.len());
        self.request_json(Method::POST, DOMAINS_PATH, &[], req).await
    }

    async fn delete_domains(&self, req: &DeleteDomainsRequest) -> Result<()> {
        log::debug!("Deleting {} domains", req.domains.len());
        self.request_empty(Method::DELETE, DOMAINS_PATH, req).await
    }

    async fn validate_domains(
        &self,
        req: &ValidateDomainsRequest,
    ) -> Result<ValidateDomainsResponse> {
        ensure_within_limit("validate", req.domains.len(), MAX_VALIDATE_DOMAINS)?;
        log::debug!("Validating {} domains", req.domains.len());
        self.request_json(
            Method::POST,
            &format!("{DOMAINS_PATH}/validate-now"),
            &[],
            req,
        )
        .await
    }

    async fn invalidate_domains(
        &self,
        req: &InvalidateDomainsRequest,
    ) -> Result<InvalidateDomainsResponse> {
        log::debug!("Invalidating {} domains", req.domains.len());
        self.request_json(
            Method::POST,
            &format!("{DOMAINS_PATH}/invalidate"),
            &[],
            req,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_enforced() {
        assert!(ensure_within_limit("validate", 100, MAX_VALIDATE_DOMAINS).is_ok());
        let res = ensure_within_limit("validate", 101, MAX_VALIDATE_DOMAINS);
        assert!(matches!(res, Err(ApiError::InvalidRequest { .. })));
    }
}
