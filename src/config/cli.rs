use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::domain::model::MatchPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{validate_endpoint, validate_timeout_seconds, Validate};
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// 呼叫遠端 HTTP 服務
    #[default]
    Http,
    /// 使用內建展示資料
    Demo,
    /// 模擬服務無法連線，只查備援表
    Offline,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "da-resolver")]
#[command(about = "Resolve a Japanese digital address into a postal code and full address")]
pub struct CliConfig {
    /// Digital address to resolve; omit to read addresses from stdin
    pub address: Option<String>,

    #[arg(long, env = "DA_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, env = "DA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value_t = Backend::Http)]
    pub backend: Backend,

    /// Match fallback keys ignoring case
    #[arg(long)]
    pub case_insensitive: bool,

    /// Print outcomes as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 命令列參數優先，未指定的欄位才取 TOML 的值
    pub fn merge_toml(&mut self, file: &TomlConfig) {
        if self.endpoint.is_none() {
            self.endpoint = file.endpoint().map(str::to_string);
        }
        if self.api_key.is_none() {
            self.api_key = file.api_key().map(str::to_string);
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = file.service.timeout_seconds;
        }
        if !self.case_insensitive {
            self.case_insensitive = file.match_policy() == MatchPolicy::CaseInsensitive;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> Option<&str> {
        Some(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn match_policy(&self) -> MatchPolicy {
        if self.case_insensitive {
            MatchPolicy::CaseInsensitive
        } else {
            MatchPolicy::Verbatim
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            validate_endpoint("endpoint", endpoint)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validate_timeout_seconds("timeout_seconds", timeout)?;
        }
        Ok(())
    }
}
