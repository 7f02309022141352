use serde::{Deserialize, Serialize};

/// Unified error type for all Domain Ownership API operations.
///
/// All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues, HTTP 502/503/504
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): API rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential backoff.
/// Nothing above the HTTP client retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error body, if available.
        raw_message: Option<String>,
    },

    /// EdgeGrid credentials were rejected (HTTP 401).
    InvalidCredentials {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The API client lacks the grant for this operation (HTTP 403).
    PermissionDenied {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The requested resource does not exist (HTTP 404).
    NotFound {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The request was rejected as invalid (HTTP 400/422).
    InvalidRequest {
        /// Problem title.
        title: String,
        /// Problem detail.
        detail: String,
    },

    /// The request conflicts with the current state of the domain (HTTP 409).
    Conflict {
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// Any other non-success response.
    Unknown {
        /// HTTP status, when one was received.
        status: Option<u16>,
        /// Raw error message or body.
        raw_message: String,
    },
}

impl ApiError {
    /// 是否为预期行为（凭证、权限、请求参数等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::NotFound { .. }
                | Self::InvalidRequest { .. }
                | Self::Conflict { .. }
        )
    }

    /// Whether the HTTP client should retry the request that produced this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::RateLimited { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::InvalidCredentials { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Invalid credentials: {msg}")
                } else {
                    write!(f, "Invalid credentials")
                }
            }
            Self::PermissionDenied { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Permission denied: {msg}")
                } else {
                    write!(f, "Permission denied")
                }
            }
            Self::NotFound { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Not found: {msg}")
                } else {
                    write!(f, "Not found")
                }
            }
            Self::InvalidRequest { title, detail } => {
                if detail.is_empty() {
                    write!(f, "Invalid request: {title}")
                } else {
                    write!(f, "Invalid request: {title}: {detail}")
                }
            }
            Self::Conflict { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Conflict: {msg}")
                } else {
                    write!(f, "Conflict")
                }
            }
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::SerializationError { detail } => write!(f, "Serialization error: {detail}"),
            Self::Unknown {
                status,
                raw_message,
            } => {
                if let Some(status) = status {
                    write!(f, "HTTP {status}: {raw_message}")
                } else {
                    write!(f, "{raw_message}")
                }
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_request_with_detail() {
        let e = ApiError::InvalidRequest {
            title: "Bad Request".into(),
            detail: "domainName is required".into(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid request: Bad Request: domainName is required"
        );
    }

    #[test]
    fn display_unknown_with_status() {
        let e = ApiError::Unknown {
            status: Some(500),
            raw_message: "boom".into(),
        };
        assert_eq!(e.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn serialize_tags_code() {
        let e = ApiError::NotFound { raw_message: None };
        let json = serde_json::to_value(&e).unwrap_or_default();
        assert_eq!(json["code"], "NotFound");
    }

    #[test]
    fn expected_vs_unexpected() {
        assert!(ApiError::PermissionDenied { raw_message: None }.is_expected());
        assert!(
            !ApiError::NetworkError {
                detail: "reset".into()
            }
            .is_expected()
        );
    }

    #[test]
    fn retryable_classification() {
        assert!(
            ApiError::Timeout {
                detail: "slow".into()
            }
            .is_retryable()
        );
        assert!(
            ApiError::RateLimited {
                retry_after: Some(1),
                raw_message: None
            }
            .is_retryable()
        );
        assert!(
            !ApiError::Conflict { raw_message: None }.is_retryable()
        );
        assert!(
            !ApiError::ParseError {
                detail: "x".into()
            }
            .is_retryable()
        );
    }
}
