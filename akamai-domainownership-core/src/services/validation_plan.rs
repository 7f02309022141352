//! Validate / invalidate set calculation
//!
//! Pure functions over three snapshots of one reconciliation pass:
//! `api` (search result), `state` (previously persisted) and `plan` (desired).
//! None of the inputs is mutated.

use std::collections::{HashMap, HashSet};

use akamai_domainownership_api::{
    DomainKey, DomainStatus, InvalidateDomainsRequest, MAX_VALIDATE_DOMAINS, ValidateDomainItem,
    ValidateDomainsRequest, ValidationMethod,
};

use crate::error::{CoreError, CoreResult};
use crate::types::{DomainMap, PlanMap};

/// Domains to validate (with requested method) and to invalidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationPlan {
    pub to_validate: HashMap<DomainKey, Option<ValidationMethod>>,
    pub to_invalidate: HashSet<DomainKey>,
}

impl ValidationPlan {
    /// Computes both sets; the first failing plan domain aborts the calculation.
    pub fn compute(api: &DomainMap, state: &DomainMap, plan: &PlanMap) -> CoreResult<Self> {
        Ok(Self {
            to_validate: calculate_domains_to_validate(api, plan)?,
            to_invalidate: calculate_domains_to_invalidate(api, state, plan),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.to_validate.is_empty() && self.to_invalidate.is_empty()
    }

    pub fn validate_requests(&self) -> Vec<ValidateDomainsRequest> {
        build_validate_requests(&self.to_validate)
    }

    pub fn invalidate_request(&self) -> Option<InvalidateDomainsRequest> {
        build_invalidate_request(&self.to_invalidate)
    }
}

/// Plan domains that still need a validate-now call.
///
/// `VALIDATED` domains are skipped; `INVALIDATED` and `TOKEN_EXPIRED` are fatal.
pub fn calculate_domains_to_validate(
    api: &DomainMap,
    plan: &PlanMap,
) -> CoreResult<HashMap<DomainKey, Option<ValidationMethod>>> {
    let mut keys: Vec<&DomainKey> = plan.keys().collect();
    keys.sort();

    let mut to_validate = HashMap::new();
    for key in keys {
        let Some(details) = api.get(key) else {
            return Err(CoreError::NotFoundInApi {
                domain_name: key.domain_name.clone(),
                validation_scope: key.validation_scope,
            });
        };

        match details.validation_status {
            DomainStatus::Validated => {
                log::debug!("Domain {key} is already validated");
            }
            status @ (DomainStatus::Invalidated | DomainStatus::TokenExpired) => {
                return Err(CoreError::InvalidDomainState {
                    domain_name: key.domain_name.clone(),
                    validation_scope: key.validation_scope,
                    status,
                });
            }
            _ => {
                to_validate.insert(key.clone(), plan.get(key).copied().flatten());
            }
        }
    }
    Ok(to_validate)
}

/// State domains dropped from the plan that the API still reports as `VALIDATED`.
pub fn calculate_domains_to_invalidate(
    api: &DomainMap,
    state: &DomainMap,
    plan: &PlanMap,
) -> HashSet<DomainKey> {
    state
        .keys()
        .filter(|key| !plan.contains_key(*key))
        .filter(|key| {
            api.get(*key)
                .is_some_and(|d| d.validation_status == DomainStatus::Validated)
        })
        .cloned()
        .collect()
}

/// Sorted by `(domain_name, validation_scope)`, at most [`MAX_VALIDATE_DOMAINS`] per request.
pub fn build_validate_requests(
    domains: &HashMap<DomainKey, Option<ValidationMethod>>,
) -> Vec<ValidateDomainsRequest> {
    let mut sorted: Vec<(&DomainKey, &Option<ValidationMethod>)> = domains.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    sorted
        .chunks(MAX_VALIDATE_DOMAINS)
        .map(|chunk| ValidateDomainsRequest {
            domains: chunk
                .iter()
                .map(|(key, method)| ValidateDomainItem {
                    domain_name: key.domain_name.clone(),
                    validation_scope: key.validation_scope,
                    validation_method: **method,
                })
                .collect(),
        })
        .collect()
}

/// One request sorted by domain name only; `None` for an empty set.
pub fn build_invalidate_request(domains: &HashSet<DomainKey>) -> Option<InvalidateDomainsRequest> {
    if domains.is_empty() {
        return None;
    }
    let mut sorted: Vec<DomainKey> = domains.iter().cloned().collect();
    sorted.sort_by(|a, b| a.domain_name.cmp(&b.domain_name));
    Some(InvalidateDomainsRequest { domains: sorted })
}
