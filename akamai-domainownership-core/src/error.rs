//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use akamai_domainownership_api::{
    DomainError, DomainKey, DomainStatus, ValidationLevel, ValidationScope,
};

// Re-export library error type
pub use akamai_domainownership_api::ApiError;

/// Outcome of the compensating delete after a partially failed add
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message")]
pub enum RollbackOutcome {
    /// Every domain added in the failed batch was deleted again
    Successful,
    /// The add succeeded for no domain, nothing was deleted
    NothingAdded,
    /// The compensating delete failed; domains must be cleaned up manually
    Failed(ApiError),
}

impl std::fmt::Display for RollbackOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Successful => write!(f, "Rollback was successful"),
            Self::NothingAdded => write!(f, "Rollback was successful (no domain was added)"),
            Self::Failed(e) => write!(f, "Rollback was not successful: API error: {e}"),
        }
    }
}

fn join_domain_errors(errors: &[DomainError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_scopes(scopes: &[ValidationScope]) -> String {
    scopes
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Planned domain missing from the search response
    #[error("domain '{domain_name}' with validation scope '{validation_scope}' not found in the API")]
    NotFoundInApi {
        domain_name: String,
        validation_scope: ValidationScope,
    },

    /// Planned domain in a status that can no longer be validated
    #[error(
        "domain '{domain_name}' with validation scope '{validation_scope}' has status {status} and cannot be validated; delete and recreate the domain"
    )]
    InvalidDomainState {
        domain_name: String,
        validation_scope: ValidationScope,
        status: DomainStatus,
    },

    /// Domain already covered by a validated parent domain or wildcard
    #[error(
        "domain '{domain_name}' with validation scope '{validation_scope}' is already part of other validated domain/wildcard"
    )]
    AlreadyValidatedByParent {
        domain_name: String,
        validation_scope: ValidationScope,
    },

    /// Per-domain add errors, with the result of the compensating delete
    #[error("failed to add domains:\n{}\n{rollback}", join_domain_errors(.errors))]
    AddDomainsFailed {
        errors: Vec<DomainError>,
        rollback: RollbackOutcome,
    },

    /// Polling deadline passed with domains still not validated
    #[error("Timeout while waiting for domain validation ({} domains not validated)", .pending.len())]
    ValidationTimeout { pending: Vec<DomainKey> },

    /// Malformed import identifier
    #[error("invalid import ID format: {0}")]
    InvalidImportId(String),

    /// The same declaration appears twice in an import identifier
    #[error("duplicate entry '{0}' in import ID")]
    DuplicateImportEntry(String),

    /// A name declared both bare and with a scope
    #[error("domain '{0}' is specified both with and without a validation scope in import ID")]
    DuplicateImportCombination(String),

    /// More entries than a single import accepts
    #[error("import ID contains {count} domains, at most {max} are allowed")]
    TooManyImportDomains { count: usize, max: usize },

    /// Import target not found at FQDN level
    #[error("domain '{0}' not found")]
    ImportNotFound(String),

    /// Import target matched, but not as an exact FQDN domain
    #[error("domain '{domain}' has validation level {level}; only FQDN domains can be imported")]
    ImportNotFqdn {
        domain: String,
        level: ValidationLevel,
    },

    /// Import target is invalidated
    #[error("domain '{0}' has status INVALIDATED and cannot be imported")]
    ImportInvalidated(String),

    /// Bare-name import target that has not been validated yet
    #[error(
        "domain '{0}' has status REQUEST_ACCEPTED; re-import specifying the validation scope"
    )]
    ImportRequestAccepted(String),

    /// Bare-name import matching more than one scope
    #[error(
        "domain '{domain_name}' exists with multiple validation scopes ({}), re-import specifying scope",
        join_scopes(.scopes)
    )]
    ImportMultipleScopes {
        domain_name: String,
        scopes: Vec<ValidationScope>,
    },

    /// Configuration lists the same domain twice
    #[error("duplicate domain {0} in configuration")]
    DuplicateDomain(DomainKey),

    /// API error, with the operation that issued it
    #[error("{operation}: API error: {source}")]
    Api {
        operation: &'static str,
        #[source]
        source: ApiError,
    },
}

impl CoreError {
    /// Wraps an API error with the name of the failing operation.
    ///
    /// Intended for `map_err`: `.map_err(CoreError::api("search domains"))`.
    pub fn api(operation: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Api { operation, source }
    }

    /// Whether it is expected behavior (user input, resource state, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotFoundInApi { .. }
            | Self::InvalidDomainState { .. }
            | Self::AlreadyValidatedByParent { .. }
            | Self::InvalidImportId(_)
            | Self::DuplicateImportEntry(_)
            | Self::DuplicateImportCombination(_)
            | Self::TooManyImportDomains { .. }
            | Self::ImportNotFound(_)
            | Self::ImportNotFqdn { .. }
            | Self::ImportInvalidated(_)
            | Self::ImportRequestAccepted(_)
            | Self::ImportMultipleScopes { .. }
            | Self::DuplicateDomain(_) => true,
            Self::Api { source, .. } => source.is_expected(),
            Self::AddDomainsFailed { .. } | Self::ValidationTimeout { .. } => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
