//! Akamai problem+json 错误映射
//!
//! 参考: <https://techdocs.akamai.com/developer/docs/problem-details>
//!
//! 429 与 502/503/504 在 `HttpUtils` 中已处理，这里只会看到其余非 2xx 状态码。

use crate::error::ApiError;
use crate::traits::RawApiError;
use crate::types::ProblemDetail;

/// 状态码 → 统一错误类型
pub(crate) fn map_error(raw: RawApiError) -> ApiError {
    let raw_message = || {
        Some(match &raw.title {
            Some(title) if !raw.message.is_empty() => format!("{title}: {}", raw.message),
            Some(title) => title.clone(),
            None => raw.message.clone(),
        })
    };

    match raw.status {
        401 => ApiError::InvalidCredentials {
            raw_message: raw_message(),
        },
        403 => ApiError::PermissionDenied {
            raw_message: raw_message(),
        },
        404 => ApiError::NotFound {
            raw_message: raw_message(),
        },
        409 => ApiError::Conflict {
            raw_message: raw_message(),
        },
        400 | 422 => ApiError::InvalidRequest {
            title: raw.title.clone().unwrap_or_else(|| "Bad Request".to_string()),
            detail: raw.message.clone(),
        },
        status => ApiError::Unknown {
            status: Some(status),
            raw_message: raw_message().unwrap_or_default(),
        },
    }
}

/// 非 2xx 响应 → `ApiError`
///
/// 响应体优先按 problem+json 解析，失败时整段作为消息。
pub(crate) fn check_status(status: u16, response_text: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let raw = match serde_json::from_str::<ProblemDetail>(response_text) {
        Ok(problem) if problem.title.is_some() || problem.detail.is_some() => {
            log::debug!(
                "problem type={:?} status={:?}",
                problem.problem_type,
                problem.status
            );
            RawApiError {
                status,
                title: problem.title,
                message: problem.detail.unwrap_or_default(),
            }
        }
        _ => RawApiError::new(status, response_text),
    };

    let err = map_error(raw);
    if err.is_expected() {
        log::warn!("API error: {err}");
    } else {
        log::error!("API error: {err}");
    }
    Err(err)
}
