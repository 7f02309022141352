use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Limits ============

/// Maximum number of domains accepted by a single `validate-now` call.
pub const MAX_VALIDATE_DOMAINS: usize = 100;

/// Maximum number of domains accepted by a single search call.
pub const MAX_SEARCH_DOMAINS: usize = 1000;

// ============ Enumerations ============

/// Granularity at which domain ownership is claimed.
///
/// Serialized as uppercase strings (`"HOST"`, `"WILDCARD"`, `"DOMAIN"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationScope {
    /// A single host name.
    Host,
    /// All direct subdomains (`*.example.com`).
    Wildcard,
    /// The domain and everything below it.
    Domain,
}

impl ValidationScope {
    /// All scopes, in wire-name order.
    pub const ALL: [Self; 3] = [Self::Domain, Self::Host, Self::Wildcard];

    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "HOST",
            Self::Wildcard => "WILDCARD",
            Self::Domain => "DOMAIN",
        }
    }
}

impl fmt::Display for ValidationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOST" => Ok(Self::Host),
            "WILDCARD" => Ok(Self::Wildcard),
            "DOMAIN" => Ok(Self::Domain),
            other => Err(format!(
                "invalid validation scope '{other}', expected one of HOST, WILDCARD, DOMAIN"
            )),
        }
    }
}

/// Ownership validation status reported by the API.
///
/// Unrecognized values deserialize to [`DomainStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainStatus {
    /// Domain added, no validation attempted yet.
    RequestAccepted,
    /// Validation challenge is being checked.
    ValidationInProgress,
    /// Validation submitted and awaiting a result.
    Pending,
    /// Ownership confirmed.
    Validated,
    /// Ownership revoked by an invalidate request.
    Invalidated,
    /// The validation token expired before the challenge was met.
    TokenExpired,
    /// Invalidation requested and not yet applied.
    PendingCancellation,
    /// Status not known to this client.
    #[serde(other)]
    Unknown,
}

impl DomainStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestAccepted => "REQUEST_ACCEPTED",
            Self::ValidationInProgress => "VALIDATION_IN_PROGRESS",
            Self::Pending => "PENDING",
            Self::Validated => "VALIDATED",
            Self::Invalidated => "INVALIDATED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::PendingCancellation => "PENDING_CANCELLATION",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether no further automatic transition is expected from this status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Validated | Self::Invalidated | Self::TokenExpired)
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a search match is exact (`FQDN`) or covered by a broader
/// root/wildcard domain (`ROOT/WILDCARD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationLevel {
    /// Fully-qualified match on the requested name and scope.
    #[serde(rename = "FQDN")]
    Fqdn,
    /// Match through a parent domain or wildcard.
    #[serde(rename = "ROOT/WILDCARD")]
    RootOrWildcard,
    /// Level not known to this client.
    #[serde(other)]
    Unknown,
}

impl ValidationLevel {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fqdn => "FQDN",
            Self::RootOrWildcard => "ROOT/WILDCARD",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Challenge type used to prove ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMethod {
    /// CNAME record pointing at an Akamai target.
    DnsCname,
    /// TXT record carrying the validation token.
    DnsTxt,
    /// File or redirect served over HTTP.
    Http,
}

impl ValidationMethod {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DnsCname => "DNS_CNAME",
            Self::DnsTxt => "DNS_TXT",
            Self::Http => "HTTP",
        }
    }
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Identity ============

/// Composite identity of a domain: name plus validation scope.
///
/// Two domains are the same logical entity iff both fields are equal.
/// Ordering is lexicographic on `(domain_name, validation_scope wire name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainKey {
    /// Domain name, e.g. `"www.example.com"`.
    pub domain_name: String,
    /// Validation scope.
    pub validation_scope: ValidationScope,
}

impl DomainKey {
    pub fn new(domain_name: impl Into<String>, validation_scope: ValidationScope) -> Self {
        Self {
            domain_name: domain_name.into(),
            validation_scope,
        }
    }
}

impl Ord for DomainKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.domain_name
            .cmp(&other.domain_name)
            .then_with(|| {
                self.validation_scope
                    .as_str()
                    .cmp(other.validation_scope.as_str())
            })
    }
}

impl PartialOrd for DomainKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.domain_name, self.validation_scope)
    }
}

// ============ Domain Record ============

/// CNAME challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnameRecord {
    pub name: String,
    pub target: String,
}

/// TXT challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtRecord {
    pub name: String,
    pub value: String,
}

/// HTTP file challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpFile {
    pub path: String,
    pub content: String,
    pub content_type: String,
}

/// HTTP redirect challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRedirect {
    pub from: String,
    pub to: String,
}

/// Challenges the domain owner can satisfy to validate the domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationChallenge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname_record: Option<CnameRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txt_record: Option<TxtRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_file: Option<HttpFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_redirect: Option<HttpRedirect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
}

/// A domain as returned by search, add, validate and invalidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub domain_name: String,
    pub validation_scope: ValidationScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub domain_status: DomainStatus,
    /// Only present in search responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_level: Option<ValidationLevel>,
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

impl DomainRecord {
    /// Identity of this record.
    pub fn key(&self) -> DomainKey {
        DomainKey::new(self.domain_name.clone(), self.validation_scope)
    }

    /// Level reported by search, `Unknown` when absent.
    pub fn level(&self) -> ValidationLevel {
        self.validation_level.unwrap_or(ValidationLevel::Unknown)
    }
}

// ============ Requests / Responses ============

/// `POST /domains/search` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDomainsRequest {
    /// Sent as the `includeAll` query parameter, not in the body.
    #[serde(skip)]
    pub include_all: bool,
    pub domains: Vec<DomainKey>,
}

/// `POST /domains/search` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDomainsResponse {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
}

/// `POST /domains` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDomainsRequest {
    pub domains: Vec<DomainKey>,
}

/// Per-domain failure inside an add response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainError {
    pub domain_name: String,
    pub validation_scope: ValidationScope,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

impl DomainError {
    pub fn key(&self) -> DomainKey {
        DomainKey::new(self.domain_name.clone(), self.validation_scope)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}: {}",
            self.domain_name, self.validation_scope, self.title, self.detail
        )
    }
}

/// `POST /domains` response: per-domain partial success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDomainsResponse {
    #[serde(default)]
    pub successes: Vec<DomainRecord>,
    #[serde(default)]
    pub errors: Vec<DomainError>,
}

/// `DELETE /domains` request. All-or-nothing at the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDomainsRequest {
    pub domains: Vec<DomainKey>,
}

/// One entry of a `validate-now` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDomainItem {
    pub domain_name: String,
    pub validation_scope: ValidationScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_method: Option<ValidationMethod>,
}

impl ValidateDomainItem {
    pub fn key(&self) -> DomainKey {
        DomainKey::new(self.domain_name.clone(), self.validation_scope)
    }
}

/// `POST /domains/validate-now` request, at most [`MAX_VALIDATE_DOMAINS`] entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateDomainsRequest {
    pub domains: Vec<ValidateDomainItem>,
}

/// `POST /domains/validate-now` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateDomainsResponse {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
}

/// `POST /domains/invalidate` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidateDomainsRequest {
    pub domains: Vec<DomainKey>,
}

/// `POST /domains/invalidate` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidateDomainsResponse {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
}

/// Akamai `application/problem+json` error body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProblemDetail {
    #[serde(default, rename = "type")]
    pub problem_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}
