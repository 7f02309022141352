//! EdgeGrid 凭证加载
//!
//! 支持两种来源：
//! - `.edgerc` INI 文件中的某个 section（默认 `default`）
//! - 环境变量 `AKAMAI_HOST` 等；非默认 section 使用 `AKAMAI_{SECTION}_HOST`
//!
//! 环境变量完整时优先于文件。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::utils::log_sanitizer::redact_secret;

/// 默认 section 名称
pub const DEFAULT_SECTION: &str = "default";

/// 默认请求体签名上限（字节）
pub const DEFAULT_MAX_BODY: usize = 131_072;

/// 凭证加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读取 edgerc 文件失败
    #[error("unable to read edgerc file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 文件中没有该 section
    #[error("section '{0}' not found in edgerc file")]
    SectionNotFound(String),

    /// 缺少必填字段
    #[error("required field '{field}' missing in section '{section}'")]
    MissingField { section: String, field: &'static str },

    /// 字段值无效
    #[error("invalid value for '{field}': {detail}")]
    InvalidValue { field: &'static str, detail: String },

    /// 语法错误
    #[error("edgerc line {line}: {detail}")]
    Syntax { line: usize, detail: String },

    /// 未指定 edgerc 路径且无法确定用户主目录
    #[error("cannot locate the home directory for the default .edgerc, pass an explicit path")]
    HomeDirNotFound,
}

/// EdgeGrid API 客户端凭证
#[derive(Clone, PartialEq, Eq)]
pub struct EdgeGridCredentials {
    /// API 主机，如 `akab-xxxx.luna.akamaiapis.net`（不含协议）
    pub host: String,
    pub client_token: String,
    pub client_secret: String,
    pub access_token: String,
    /// POST 请求体参与签名的最大字节数
    pub max_body: usize,
}

impl std::fmt::Debug for EdgeGridCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeGridCredentials")
            .field("host", &self.host)
            .field("client_token", &redact_secret(&self.client_token))
            .field("client_secret", &"***")
            .field("access_token", &redact_secret(&self.access_token))
            .field("max_body", &self.max_body)
            .finish()
    }
}

impl EdgeGridCredentials {
    /// 先尝试环境变量，再回退到 edgerc 文件
    pub fn load(edgerc: Option<&Path>, section: Option<&str>) -> Result<Self, ConfigError> {
        let section = section.unwrap_or(DEFAULT_SECTION);
        if let Some(creds) = Self::from_env(section)? {
            log::debug!("EdgeGrid credentials loaded from environment (section '{section}')");
            return Ok(creds);
        }

        let path = match edgerc {
            Some(path) => path.to_path_buf(),
            None => default_edgerc_path()?,
        };
        let creds = Self::from_edgerc_file(&path, section)?;
        log::debug!(
            "EdgeGrid credentials loaded from {} (section '{section}')",
            path.display()
        );
        Ok(creds)
    }

    /// 读取 edgerc 文件
    pub fn from_edgerc_file(path: &Path, section: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_edgerc_str(&content, section)
    }

    /// 解析 edgerc 内容
    pub fn from_edgerc_str(content: &str, section: &str) -> Result<Self, ConfigError> {
        let sections = parse_ini(content)?;
        let values = sections
            .get(section)
            .ok_or_else(|| ConfigError::SectionNotFound(section.to_string()))?;
        Self::from_values(section, |key| values.get(key).cloned())
    }

    /// 从环境变量读取；四个必填变量都不存在时返回 `Ok(None)`
    pub fn from_env(section: &str) -> Result<Option<Self>, ConfigError> {
        Self::from_env_with(section, |name| std::env::var(name).ok())
    }

    fn from_env_with(
        section: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let prefix = if section == DEFAULT_SECTION {
            "AKAMAI".to_string()
        } else {
            format!("AKAMAI_{}", section.to_uppercase())
        };
        let var = |key: &str| lookup(&format!("{prefix}_{}", key.to_uppercase()));

        let any_present = ["host", "client_token", "client_secret", "access_token"]
            .iter()
            .any(|k| var(k).is_some());
        if !any_present {
            return Ok(None);
        }
        Self::from_values(section, var).map(Some)
    }

    fn from_values(
        section: &str,
        get: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let required = |field: &'static str| {
            get(field)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingField {
                    section: section.to_string(),
                    field,
                })
        };

        let host = required("host")?;
        let host = host
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();

        let max_body = match get("max_body") {
            Some(v) => v.parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                field: "max_body",
                detail: e.to_string(),
            })?,
            None => DEFAULT_MAX_BODY,
        };

        Ok(Self {
            host,
            client_token: required("client_token")?,
            client_secret: required("client_secret")?,
            access_token: required("access_token")?,
            max_body,
        })
    }
}

/// `~/.edgerc`
fn default_edgerc_path() -> Result<PathBuf, ConfigError> {
    edgerc_in(dirs::home_dir())
}

fn edgerc_in(home: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    home.map(|dir| dir.join(".edgerc"))
        .ok_or(ConfigError::HomeDirNotFound)
}

/// 最小 INI 解析：`[section]`、`key = value`、`#`/`;` 注释
fn parse_ini(content: &str) -> Result<HashMap<String, HashMap<String, String>>, ConfigError> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[') {
            let name = name.strip_suffix(']').ok_or_else(|| ConfigError::Syntax {
                line: idx + 1,
                detail: "unterminated section header".to_string(),
            })?;
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Syntax {
            line: idx + 1,
            detail: "expected 'key = value'".to_string(),
        })?;
        let Some(section) = current.as_ref() else {
            return Err(ConfigError::Syntax {
                line: idx + 1,
                detail: "key outside of any section".to_string(),
            });
        };

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_lowercase(), value.to_string());
    }

    Ok(sections)
}
