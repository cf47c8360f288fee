use crate::utils::error::{PrepError, Result};
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> PrepError {
    PrepError::InvalidConfigValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 僅接受 http / https
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "URL cannot be empty"));
    }

    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, value, format!("Unsupported URL scheme: {}", scheme))),
    }
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_default(), "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_positive_number(field: &str, value: usize, min: usize) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(field: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("Value must be between {} and {}", min, max)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("search.base_url", "https://api.exa.ai").is_ok());
        assert!(validate_url("search.base_url", "http://127.0.0.1:9000").is_ok());
        assert!(validate_url("search.base_url", "").is_err());
        assert!(validate_url("search.base_url", "invalid-url").is_err());
        assert!(validate_url("search.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("archive.output_path", "./briefings").is_ok());
        assert!(validate_path("archive.output_path", "  ").is_err());
        assert!(validate_path("archive.output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("concurrent_requests", 5, 1).is_ok());
        assert!(validate_positive_number("concurrent_requests", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_reports_field() {
        assert!(validate_range("num_results", 3, 1, 25).is_ok());
        assert!(validate_range("num_results", 0, 1, 25).is_err());

        let err = validate_range("num_results", 26, 1, 25).unwrap_err();
        match err {
            PrepError::InvalidConfigValue { field, value, .. } => {
                assert_eq!(field, "num_results");
                assert_eq!(value, "26");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
