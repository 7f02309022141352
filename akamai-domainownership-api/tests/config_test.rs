//! edgerc 文件加载测试

mod common;

use std::io::Write;

use akamai_domainownership_api::{ConfigError, EdgeGridCredentials};

const EDGERC: &str = "\
; comment
[default]
host = https://akab-default.luna.akamaiapis.net/
client_token = akab-ct
client_secret = secret=with=equals
access_token = akab-at

[staging]
host = akab-staging.luna.akamaiapis.net
client_token = ct2
client_secret = cs2
access_token = at2
max_body = 2048
";

fn write_edgerc(content: &str) -> Option<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new().ok()?;
    file.write_all(content.as_bytes()).ok()?;
    Some(file)
}

#[test]
fn test_load_sections_from_file() {
    let file = require_some!(write_edgerc(EDGERC));

    let default = require_ok!(EdgeGridCredentials::from_edgerc_file(
        file.path(),
        "default"
    ));
    assert_eq!(default.host, "akab-default.luna.akamaiapis.net");
    assert_eq!(default.client_secret, "secret=with=equals");
    assert_eq!(default.max_body, 131_072);

    let staging = require_ok!(EdgeGridCredentials::from_edgerc_file(
        file.path(),
        "staging"
    ));
    assert_eq!(staging.client_token, "ct2");
    assert_eq!(staging.max_body, 2048);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = require_ok!(tempfile::tempdir());
    let res = EdgeGridCredentials::from_edgerc_file(&dir.path().join("absent"), "default");
    assert!(matches!(res, Err(ConfigError::Io { .. })));
}

#[test]
fn test_unknown_section() {
    let file = require_some!(write_edgerc(EDGERC));
    let res = EdgeGridCredentials::from_edgerc_file(file.path(), "prod");
    assert!(matches!(res, Err(ConfigError::SectionNotFound(s)) if s == "prod"));
}
