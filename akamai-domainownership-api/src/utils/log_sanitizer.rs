//! Log sanitization utilities
//!
//! Keeps EdgeGrid secrets and large response bodies out of debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret left visible.
const SECRET_VISIBLE_PREFIX: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a credential, keeping only a short prefix (`akab-***`).
pub fn redact_secret(s: &str) -> String {
    if s.chars().count() <= SECRET_VISIBLE_PREFIX * 2 {
        return "***".to_string();
    }
    let prefix: String = s.chars().take(SECRET_VISIBLE_PREFIX).collect();
    format!("{prefix}***")
}

/// Remove `client_token` / `access_token` / `signature` values from an
/// EdgeGrid `Authorization` header.
pub fn redact_auth_header(header: &str) -> String {
    header
        .split(';')
        .map(|part| match part.split_once('=') {
            Some((k, v)) if k.trim_start().ends_with("token") || k == "signature" => {
                format!("{k}={}", redact_secret(v))
            }
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Mask the value of one query parameter in a URL.
pub fn redact_query_value(url: &str, name: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) if k == name => format!("{k}={}", redact_secret(v)),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        let s = "hello world";
        assert_eq!(truncate_for_log(s), s);
    }

    #[test]
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
        assert!(result.contains(&format!("{} bytes]", TRUNCATE_LIMIT + 100)));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "域".repeat(200); // 3 bytes each
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
    }

    #[test]
    fn secret_keeps_prefix() {
        assert_eq!(redact_secret("akab-abcdefghijklmnop"), "akab***");
        assert_eq!(redact_secret("short"), "***");
    }

    #[test]
    fn auth_header_redacted() {
        let header = "EG1-HMAC-SHA256 client_token=akab-client-xxxxxxxx;access_token=akab-access-yyyyyyyy;timestamp=20250101T00:00:00+0000;nonce=n;signature=c2lnbmF0dXJlLXZhbHVl";
        let redacted = redact_auth_header(header);
        assert!(!redacted.contains("xxxxxxxx"));
        assert!(!redacted.contains("yyyyyyyy"));
        assert!(!redacted.contains("c2lnbmF0dXJlLXZhbHVl"));
        assert!(redacted.contains("timestamp=20250101T00:00:00+0000"));
    }

    #[test]
    fn query_value_redacted() {
        let url = "https://akab.example.net/d?includeAll=true&accountSwitchKey=1-ABCDEF%3A1-2";
        assert_eq!(
            redact_query_value(url, "accountSwitchKey"),
            "https://akab.example.net/d?includeAll=true&accountSwitchKey=1-AB***"
        );
        assert_eq!(redact_query_value("https://h/d", "accountSwitchKey"), "https://h/d");
    }
}
