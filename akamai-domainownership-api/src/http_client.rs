//! Generic HTTP client tools
//!
//! Sending requests, logging, reading responses, and retrying transient failures.
//! Signing stays with the caller: every retry attempt asks the caller for a freshly
//! built request, because an EdgeGrid signature embeds a timestamp and a one-time nonce.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ApiError;
use crate::utils::log_sanitizer::{redact_query_value, truncate_for_log};

/// Query parameter carrying the managed account id; kept out of logs.
const ACCOUNT_SWITCH_KEY: &str = "accountSwitchKey";

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Sends one signed request and returns `(status, body)`
    ///
    /// 429 and 502-504 come back as retryable errors; every other status is
    /// left to the caller's status check.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ApiError> {
        let target = redact_query_value(url, ACCOUNT_SWITCH_KEY);
        log::debug!("[EdgeGrid] {method_name} {target}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ApiError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;
        log::debug!(
            "[EdgeGrid] {method_name} {target} -> HTTP {status_code}: {}",
            truncate_for_log(&body)
        );

        match transient_error(status_code, retry_after, &body) {
            Some(err) => {
                log::warn!("[EdgeGrid] {method_name} {target}: {err}");
                Err(err)
            }
            None => Ok((status_code, body)),
        }
    }

    /// Parse JSON response
    pub fn parse_json<T>(response_text: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!(
                "[EdgeGrid] unexpected response shape ({e}): {}",
                truncate_for_log(response_text)
            );
            ApiError::ParseError {
                detail: e.to_string(),
            }
        })
    }

    /// Performs an HTTP request with retries
    ///
    /// `build_request` is called once per attempt and must return a newly signed request.
    ///
    /// # Retry strategy
    /// - Only [`ApiError::is_retryable`] errors are retried
    /// - Exponential backoff: 100ms, 200ms, 400ms, 800ms, ... (maximum 10 seconds)
    /// - `Retry-After` from a 429 response wins over backoff (capped at 30 seconds)
    pub async fn execute_request_with_retry<F>(
        build_request: F,
        method_name: &str,
        url: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ApiError>
    where
        F: Fn() -> Result<RequestBuilder, ApiError>,
    {
        let mut last_error = None;

        for attempt in 0..=max_retries {
            let request = build_request()?;
            match Self::execute_request(request, method_name, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::NetworkError {
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Statuses the gateway reports for throttling or an unavailable backend.
fn transient_error(status_code: u16, retry_after: Option<u64>, body: &str) -> Option<ApiError> {
    match status_code {
        429 => Some(ApiError::RateLimited {
            retry_after,
            raw_message: Some(body.to_string()),
        }),
        502..=504 => Some(ApiError::NetworkError {
            detail: format!("HTTP {status_code}: {}", truncate_for_log(body)),
        }),
        _ => None,
    }
}

/// Use `retry_after` (capped at 30s) for `RateLimited`, exponential backoff otherwise.
fn retry_delay(error: &ApiError, attempt: u32) -> Duration {
    if let ApiError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// Backoff strategy: 100ms, 200ms, 400ms, 800ms, 1.6s, ... capped at 10 seconds
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
