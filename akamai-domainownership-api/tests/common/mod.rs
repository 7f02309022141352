//! 共享测试工具和辅助函数

#![allow(dead_code)]

use akamai_domainownership_api::{EdgeGridClient, EdgeGridCredentials};
use wiremock::MockServer;

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 测试凭证（签名仍然针对这个 host 计算）
pub fn test_credentials() -> EdgeGridCredentials {
    EdgeGridCredentials {
        host: "akab-test.luna.akamaiapis.net".to_string(),
        client_token: "akab-client-token-test".to_string(),
        client_secret: "test-client-secret".to_string(),
        access_token: "akab-access-token-test".to_string(),
        max_body: 131_072,
    }
}

/// 指向 mock server 的客户端
pub fn client_for(server: &MockServer, max_retries: u32) -> Option<EdgeGridClient> {
    EdgeGridClient::builder(test_credentials())
        .base_url(server.uri())
        .max_retries(max_retries)
        .build()
        .ok()
}
