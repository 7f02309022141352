//! EdgeGrid `EG1-HMAC-SHA256` request signing
//!
//! Reference: <https://techdocs.akamai.com/developer/docs/authenticate-with-edgegrid>

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::EdgeGridClient;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 计算
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// EdgeGrid 时间戳格式：`20250101T00:00:00+0000`
pub(crate) fn edgegrid_timestamp(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%Y%m%dT%H:%M:%S+0000").to_string()
}

impl EdgeGridClient {
    /// 生成 Authorization 头
    ///
    /// `path_and_query` 为不含 scheme/host 的请求路径（包括查询串）。
    pub(crate) fn sign(
        &self,
        method: &str,
        path_and_query: &str,
        body: &[u8],
        timestamp: &str,
        nonce: &str,
    ) -> String {
        let creds = &self.credentials;

        // 1. 未签名的 Authorization 前缀
        let auth_prefix = format!(
            "EG1-HMAC-SHA256 client_token={};access_token={};timestamp={timestamp};nonce={nonce};",
            creds.client_token, creds.access_token
        );

        // 2. 请求体哈希：仅 POST，截断到 max_body
        let content_hash = if method.eq_ignore_ascii_case("POST") && !body.is_empty() {
            let signed_len = body.len().min(creds.max_body);
            STANDARD.encode(Sha256::digest(&body[..signed_len]))
        } else {
            String::new()
        };

        // 3. 待签名数据（制表符分隔；canonical headers 为空）
        let data_to_sign = [
            method.to_uppercase().as_str(),
            "https",
            creds.host.to_lowercase().as_str(),
            path_and_query,
            "",
            content_hash.as_str(),
            auth_prefix.as_str(),
        ]
        .join("\t");

        // 4. 签名密钥 = base64(HMAC(client_secret, timestamp))
        let signing_key = STANDARD.encode(hmac_sha256(
            creds.client_secret.as_bytes(),
            timestamp.as_bytes(),
        ));

        // 5. 签名 = base64(HMAC(signing_key, data_to_sign))
        let signature = STANDARD.encode(hmac_sha256(
            signing_key.as_bytes(),
            data_to_sign.as_bytes(),
        ));

        format!("{auth_prefix}signature={signature}")
    }
}
