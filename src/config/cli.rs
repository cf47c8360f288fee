use crate::config::MAX_NUM_RESULTS;
use crate::config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize, Parser)]
#[command(name = "meeting-prep")]
#[command(about = "Meeting preparation service: researches participants and industry context")]
pub struct CliConfig {
    #[arg(long, env = "MEETING_PREP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    #[arg(long, env = "EXA_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub exa_api_key: Option<String>,

    #[arg(long, env = "EXA_BASE_URL", default_value = "https://api.exa.ai")]
    pub exa_base_url: String,

    #[arg(long, default_value = "3")]
    pub num_results: usize,

    #[arg(long, default_value = "1000", help = "Characters kept per page of fetched content")]
    pub content_chars: usize,

    #[arg(long, default_value = "5")]
    pub concurrent_requests: usize,

    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    #[arg(long, default_value = "2")]
    pub retry_attempts: u32,

    #[arg(long, help = "Directory where generated briefings are archived")]
    pub archive_dir: Option<String>,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log process CPU and memory usage per run")]
    pub monitor: bool,
}

impl CliConfig {
    /// 指定 `--config` 時載入 TOML 檔，其設定取代旗標
    pub fn load_toml(&self) -> Result<Option<TomlConfig>> {
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path).map(Some)
            }
            None => Ok(None),
        }
    }
}

// API key 只顯示是否設定
impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "exa_api_key",
                &self.exa_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("exa_base_url", &self.exa_base_url)
            .field("num_results", &self.num_results)
            .field("content_chars", &self.content_chars)
            .field("concurrent_requests", &self.concurrent_requests)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("archive_dir", &self.archive_dir)
            .field("config", &self.config)
            .field("verbose", &self.verbose)
            .field("json_logs", &self.json_logs)
            .field("monitor", &self.monitor)
            .finish()
    }
}

impl ConfigProvider for CliConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn exa_base_url(&self) -> &str {
        &self.exa_base_url
    }

    fn exa_api_key(&self) -> Option<&str> {
        self.exa_api_key.as_deref()
    }

    fn num_results(&self) -> usize {
        self.num_results
    }

    fn content_chars(&self) -> usize {
        self.content_chars
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn archive_dir(&self) -> Option<&str> {
        self.archive_dir.as_deref()
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("host", &self.host)?;
        validate_url("exa_base_url", &self.exa_base_url)?;
        validate_range("num_results", self.num_results, 1, MAX_NUM_RESULTS)?;
        validate_positive_number("content_chars", self.content_chars, 1)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs as usize, 1)?;
        if let Some(dir) = &self.archive_dir {
            validate_path("archive_dir", dir)?;
        }
        Ok(())
    }
}
