//! 类型定义模块

mod domain;
mod resource;

pub use domain::{DomainDetails, DomainMap, PlanMap};
pub use resource::{
    DomainState, DomainsState, ValidationEntry, ValidationState, ValidationTarget,
};

// Re-export API 库的公共类型
pub use akamai_domainownership_api::{
    DomainKey, DomainRecord, DomainStatus, ValidationChallenge, ValidationLevel,
    ValidationMethod, ValidationScope,
};
