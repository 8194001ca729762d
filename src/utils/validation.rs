use crate::utils::error::{BridgeError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BridgeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| BridgeError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Longest pause accepted between two upstream requests.
pub const MAX_DELAY_SECONDS: f64 = 3600.0;

/// Delays are seconds between upstream requests; zero disables waiting.
pub fn validate_delay(field_name: &str, seconds: f64) -> Result<()> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: seconds.to_string(),
            reason: "Delay must be a non-negative number of seconds".to_string(),
        });
    }
    validate_range(field_name, seconds, 0.0, MAX_DELAY_SECONDS)
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint", "https://ankiuser.net/svc/editor/add-or-update").is_ok());
        assert!(validate_url("endpoint", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("endpoint", "").is_err());
        assert!(validate_url("endpoint", "invalid-url").is_err());
        assert!(validate_url("endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_delay() {
        assert!(validate_delay("delay", 0.0).is_ok());
        assert!(validate_delay("delay", 1.5).is_ok());
        assert!(validate_delay("delay", -0.1).is_err());
        assert!(validate_delay("delay", f64::NAN).is_err());
        assert!(validate_delay("delay", f64::INFINITY).is_err());
        assert!(validate_delay("delay", MAX_DELAY_SECONDS).is_ok());
        assert!(validate_delay("delay", MAX_DELAY_SECONDS + 1.0).is_err());
        assert!(validate_delay("delay", 1e20).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("has_auth=1".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("cookie", &present).unwrap(), "has_auth=1");
        assert!(matches!(
            validate_required_field("cookie", &missing),
            Err(BridgeError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("port", 8000u16, 1, u16::MAX).is_ok());
        assert!(validate_range("port", 0u16, 1, u16::MAX).is_err());
    }
}
