use crate::core::fallback::FallbackTable;
use crate::core::ConfigProvider;
use crate::domain::model::MatchPolicy;
use crate::utils::error::{ResolverError, Result};
use crate::utils::validation::{
    validate_endpoint, validate_not_blank, validate_timeout_seconds, Validate,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub fallback: Vec<FallbackRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub policy: MatchPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRow {
    pub match_key: String,
    pub postal_code: String,
    pub full_address: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ResolverError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ResolverError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DA_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 建立備援表；沒有設定任何列時回傳 None，使用內建表
    pub fn fallback_table(&self) -> Result<Option<FallbackTable>> {
        if self.fallback.is_empty() {
            return Ok(None);
        }
        let rows = self.fallback.iter().map(|row| {
            (
                row.match_key.as_str(),
                row.postal_code.as_str(),
                row.full_address.as_str(),
            )
        });
        FallbackTable::from_rows(rows).map(Some)
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(endpoint) = &self.service.endpoint {
            validate_endpoint("service.endpoint", endpoint)?;
        }

        if let Some(timeout) = self.service.timeout_seconds {
            validate_timeout_seconds("service.timeout_seconds", timeout)?;
        }

        for (index, row) in self.fallback.iter().enumerate() {
            validate_not_blank(&format!("fallback[{}].match_key", index), &row.match_key)?;
        }
        self.fallback_table()?;

        Ok(())
    }
}

fn is_unresolved_placeholder(value: &str) -> bool {
    ENV_PLACEHOLDER.is_match(value)
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> Option<&str> {
        self.service.endpoint.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        self.service
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty() && !is_unresolved_placeholder(key))
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.service.timeout_seconds.map(Duration::from_secs)
    }

    fn match_policy(&self) -> MatchPolicy {
        self.matching.policy
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
