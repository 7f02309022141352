//! EdgeGrid HTTP 请求方法

use chrono::Utc;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::http_client::HttpUtils;
use crate::utils::log_sanitizer::{redact_auth_header, truncate_for_log};

use super::EdgeGridClient;
use super::error::check_status;
use super::sign::edgegrid_timestamp;

impl EdgeGridClient {
    // ==================== 辅助方法 ====================

    /// 拼接完整 URL，并返回参与签名的 path + query
    fn resolve_url(&self, path: &str, query: &[(&str, String)]) -> Result<(String, String)> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| {
            ApiError::InvalidRequest {
                title: "Invalid URL".to_string(),
                detail: e.to_string(),
            }
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
            if let Some(key) = &self.account_switch_key {
                pairs.append_pair("accountSwitchKey", key);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let path_and_query = match url.query() {
            Some(q) => format!("{}?{q}", url.path()),
            None => url.path().to_string(),
        };
        Ok((url.to_string(), path_and_query))
    }

    /// 签名并发送请求，返回 2xx 响应体
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Vec<u8>,
    ) -> Result<String> {
        let (url, path_and_query) = self.resolve_url(path, query)?;

        if !payload.is_empty() {
            log::debug!(
                "Request Body: {}",
                truncate_for_log(&String::from_utf8_lossy(&payload))
            );
        }

        // 每次重试都重新签名（时间戳和 nonce 不可复用）
        let build = || {
            let timestamp = edgegrid_timestamp(Utc::now());
            let nonce = Uuid::new_v4().to_string();
            let authorization =
                self.sign(method.as_str(), &path_and_query, &payload, &timestamp, &nonce);
            log::trace!("Authorization: {}", redact_auth_header(&authorization));

            let mut request = self
                .client
                .request(method.clone(), &url)
                .header("Authorization", authorization)
                .header("Accept", "application/json");
            if !payload.is_empty() {
                request = request
                    .header("Content-Type", "application/json")
                    .body(payload.clone());
            }
            Ok(request)
        };

        let (status, response_text) =
            HttpUtils::execute_request_with_retry(build, method.as_str(), &url, self.max_retries)
                .await?;

        check_status(status, &response_text)?;
        Ok(response_text)
    }

    fn serialize_body<B: Serialize>(body: &B) -> Result<Vec<u8>> {
        serde_json::to_vec(body).map_err(|e| ApiError::SerializationError {
            detail: e.to_string(),
        })
    }

    // ==================== 公开 API 方法 ====================

    /// 执行带 JSON 请求体的请求并解析 JSON 响应
    pub(crate) async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let payload = Self::serialize_body(body)?;
        let response_text = self.execute(method, path, query, payload).await?;
        HttpUtils::parse_json(&response_text)
    }

    /// 执行带 JSON 请求体、忽略响应体的请求
    pub(crate) async fn request_empty<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let payload = Self::serialize_body(body)?;
        self.execute(method, path, &[], payload).await.map(|_| ())
    }
}
