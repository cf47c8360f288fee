use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Search API returned {status}: {body}")]
    SearchApi { status: u16, body: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Tool '{tool}' failed: {message}")]
    Tool { tool: String, message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },
}

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PrepError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PrepError::Http(_) | PrepError::SearchApi { .. } => ErrorCategory::Network,
            PrepError::Config { .. }
            | PrepError::MissingConfig { .. }
            | PrepError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            PrepError::Validation { .. } => ErrorCategory::Input,
            PrepError::Tool { .. }
            | PrepError::Processing { .. }
            | PrepError::Serialization(_) => ErrorCategory::Processing,
            PrepError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PrepError::Validation { .. } => ErrorSeverity::Low,
            PrepError::Http(_) | PrepError::Tool { .. } => ErrorSeverity::Medium,
            // 5xx/429 可重試，其餘 4xx 多半是金鑰或參數問題
            PrepError::SearchApi { status, .. } if *status >= 500 || *status == 429 => {
                ErrorSeverity::Medium
            }
            PrepError::SearchApi { .. }
            | PrepError::Processing { .. }
            | PrepError::Serialization(_) => ErrorSeverity::High,
            PrepError::Config { .. }
            | PrepError::MissingConfig { .. }
            | PrepError::InvalidConfigValue { .. }
            | PrepError::Io(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否值得重試（暫時性網路錯誤）
    pub fn is_retryable(&self) -> bool {
        match self {
            PrepError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            PrepError::SearchApi { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PrepError::Http(_) => {
                "Check network connectivity to the search API and try again".to_string()
            }
            PrepError::SearchApi { status: 401, .. } | PrepError::SearchApi { status: 403, .. } => {
                "Verify that EXA_API_KEY is set to a valid key".to_string()
            }
            PrepError::SearchApi { status: 429, .. } => {
                "The search API is rate limiting requests; lower --concurrent-requests or retry later"
                    .to_string()
            }
            PrepError::SearchApi { .. } => "Retry the request; the search API may be degraded".to_string(),
            PrepError::Config { .. } => "Review the configuration file and flags".to_string(),
            PrepError::MissingConfig { field } => {
                format!("Provide a value for '{}' via flag, environment or config file", field)
            }
            PrepError::InvalidConfigValue { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            PrepError::Validation { .. } => {
                "Provide participants, context and objective in the request".to_string()
            }
            PrepError::Tool { tool, .. } => format!("Check the input passed to the '{}' tool", tool),
            PrepError::Io(_) => "Check that the archive directory exists and is writable".to_string(),
            PrepError::Serialization(_) | PrepError::Processing { .. } => {
                "Inspect the logs with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the search service: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Invalid meeting request: {}", self),
            ErrorCategory::Processing => format!("Meeting prep failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_api_severity_depends_on_status() {
        let throttled = PrepError::SearchApi {
            status: 429,
            body: String::new(),
        };
        let unauthorized = PrepError::SearchApi {
            status: 401,
            body: String::new(),
        };

        assert_eq!(throttled.severity(), ErrorSeverity::Medium);
        assert!(throttled.is_retryable());
        assert_eq!(unauthorized.severity(), ErrorSeverity::High);
        assert!(!unauthorized.is_retryable());
        assert!(unauthorized.recovery_suggestion().contains("EXA_API_KEY"));
    }

    #[test]
    fn test_validation_is_low_severity_input() {
        let err = PrepError::Validation {
            message: "no participants".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().starts_with("Invalid meeting request"));
    }
}
