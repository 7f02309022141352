//! Domain status snapshot types used by one reconciliation pass

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use akamai_domainownership_api::{
    DomainKey, DomainRecord, DomainStatus, ValidationLevel, ValidationMethod,
};

/// Status record associated with a [`DomainKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDetails {
    pub validation_status: DomainStatus,
    pub validation_level: ValidationLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_method: Option<ValidationMethod>,
}

impl DomainDetails {
    #[must_use]
    pub fn new(validation_status: DomainStatus, validation_level: ValidationLevel) -> Self {
        Self {
            validation_status,
            validation_level,
            validation_method: None,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: ValidationMethod) -> Self {
        self.validation_method = Some(method);
        self
    }
}

impl From<&DomainRecord> for DomainDetails {
    fn from(record: &DomainRecord) -> Self {
        Self {
            validation_status: record.domain_status,
            validation_level: record.level(),
            validation_method: record.validation_method,
        }
    }
}

/// Observed or persisted domains, keyed by identity
pub type DomainMap = HashMap<DomainKey, DomainDetails>;

/// Desired domains with the requested validation method
pub type PlanMap = HashMap<DomainKey, Option<ValidationMethod>>;
