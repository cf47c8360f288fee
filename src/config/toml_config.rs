use crate::adapters::exa::DEFAULT_BASE_URL;
use crate::config::{
    DEFAULT_CONCURRENT_REQUESTS, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_ATTEMPTS, MAX_NUM_RESULTS,
};
use crate::core::ConfigProvider;
use crate::tools::exa::{DEFAULT_CONTENT_CHARS, DEFAULT_NUM_RESULTS};
use crate::utils::error::{PrepError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub archive: Option<ArchiveConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub num_results: Option<usize>,
    pub content_chars: Option<usize>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| PrepError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EXA_API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl ConfigProvider for TomlConfig {
    fn host(&self) -> &str {
        self.server.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    fn port(&self) -> u16 {
        self.server.port.unwrap_or(DEFAULT_PORT)
    }

    fn exa_base_url(&self) -> &str {
        self.search.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn exa_api_key(&self) -> Option<&str> {
        // 未替換的 ${VAR} 視為未設定
        self.search
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
    }

    fn num_results(&self) -> usize {
        self.pipeline.num_results.unwrap_or(DEFAULT_NUM_RESULTS)
    }

    fn content_chars(&self) -> usize {
        self.pipeline.content_chars.unwrap_or(DEFAULT_CONTENT_CHARS)
    }

    fn concurrent_requests(&self) -> usize {
        self.pipeline
            .concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.search
                .timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    fn retry_attempts(&self) -> u32 {
        self.search.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS)
    }

    fn archive_dir(&self) -> Option<&str> {
        self.archive
            .as_ref()
            .filter(|a| a.enabled)
            .map(|a| a.output_path.as_str())
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", self.host())?;
        validate_url("search.base_url", self.exa_base_url())?;
        validate_range("pipeline.num_results", self.num_results(), 1, MAX_NUM_RESULTS)?;
        validate_positive_number("pipeline.content_chars", self.content_chars(), 1)?;
        validate_positive_number(
            "pipeline.concurrent_requests",
            self.concurrent_requests(),
            1,
        )?;
        validate_positive_number(
            "search.timeout_seconds",
            self.request_timeout().as_secs() as usize,
            1,
        )?;
        if let Some(archive) = &self.archive {
            validate_path("archive.output_path", &archive.output_path)?;
        }
        Ok(())
    }
}
