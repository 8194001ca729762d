use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Request to AnkiWeb failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("AnkiWeb rejected the request with status {status}")]
    RejectedError { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cookie database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No AnkiWeb cookies found for {browser}: {reason}")]
    CookieNotFound { browser: String, reason: String },
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a command-line tool that stopped on this error.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl BridgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::TransportError(_) => ErrorCategory::Network,
            BridgeError::RejectedError { .. } => ErrorCategory::Upstream,
            BridgeError::ConfigValidationError { .. }
            | BridgeError::InvalidConfigValueError { .. }
            | BridgeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BridgeError::CsvError(_)
            | BridgeError::SerializationError(_)
            | BridgeError::CookieNotFound { .. } => ErrorCategory::Data,
            BridgeError::IoError(_) | BridgeError::SqliteError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Upstream HTTP status, when the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BridgeError::RejectedError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BridgeError::TransportError(_) => {
                "Check your network connection and that the AnkiWeb endpoint is reachable"
            }
            BridgeError::RejectedError { status: 401 | 403, .. } => {
                "The session cookie is probably expired; log into AnkiWeb again and re-run ankiweb-cookie"
            }
            BridgeError::RejectedError { .. } => {
                "Wait a moment and retry with a larger delay between cards"
            }
            BridgeError::CsvError(_) => "Make sure the CSV file has a front and back column on every row",
            BridgeError::IoError(_) => "Check that the file exists and is readable",
            BridgeError::SqliteError(_) => {
                "Close the browser so its cookie database is not locked, or pass --cookie-db explicitly"
            }
            BridgeError::SerializationError(_) => "Check the request body is valid JSON",
            BridgeError::ConfigValidationError { .. }
            | BridgeError::InvalidConfigValueError { .. } => {
                "Fix the value on the command line, in the environment or in the config file"
            }
            BridgeError::MissingConfigError { .. } => {
                "Set ANKI_COOKIE (ankiweb-cookie --output .env prints a ready-made line)"
            }
            BridgeError::CookieNotFound { .. } => {
                "Log into https://ankiweb.net in that browser, or copy the cookie from the developer tools"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BridgeError::TransportError(_) => "Could not reach AnkiWeb".to_string(),
            BridgeError::RejectedError { status, .. } => {
                format!("Failed to add card. Status code: {}", status)
            }
            BridgeError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_status_code() {
        let err = BridgeError::RejectedError {
            status: 429,
            body: "slow down".to_string(),
        };
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(err.user_friendly_message(), "Failed to add card. Status code: 429");
    }

    #[test]
    fn test_config_errors_have_no_status() {
        let err = BridgeError::MissingConfigError {
            field: "cookie".to_string(),
        };
        assert_eq!(err.status_code(), None);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_expired_cookie_suggestion() {
        let err = BridgeError::RejectedError {
            status: 403,
            body: String::new(),
        };
        assert!(err.recovery_suggestion().contains("cookie"));
    }
}
