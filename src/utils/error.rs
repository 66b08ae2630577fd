use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} returned unexpected status {status}: {body}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{operation} returned a malformed response: {message}")]
    MalformedResponse { operation: String, message: String },

    #[error("Authorization failed with status {status}: {description}")]
    AuthorizationFailed { status: u16, description: String },

    #[error("No access token after {attempts} polls")]
    PollLimitReached { attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Data,
    Authorization,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn unexpected_status(operation: &str, status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            operation: operation.to_string(),
            status,
            body: body.into(),
        }
    }

    pub fn malformed(operation: &str, message: impl std::fmt::Display) -> Self {
        Self::MalformedResponse {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::Http(_) => ErrorCategory::Network,
            SyncError::UnexpectedStatus { .. } => ErrorCategory::Remote,
            SyncError::MalformedResponse { .. } | SyncError::Serialization(_) => {
                ErrorCategory::Data
            }
            SyncError::AuthorizationFailed { .. } | SyncError::PollLimitReached { .. } => {
                ErrorCategory::Authorization
            }
            SyncError::Io(_) => ErrorCategory::Storage,
            SyncError::ConfigError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Remote
            | ErrorCategory::Data
            | ErrorCategory::Authorization
            | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SyncError::Http(e) => format!("Could not reach the server: {}", e),
            SyncError::UnexpectedStatus {
                operation, status, ..
            } => format!("{} failed (HTTP {})", operation, status),
            SyncError::MalformedResponse { operation, .. } => {
                format!("{} returned data in an unexpected format", operation)
            }
            SyncError::AuthorizationFailed { description, .. } => {
                format!("Trakt authorization failed: {}", description)
            }
            SyncError::PollLimitReached { attempts } => format!(
                "Authorization was not completed after {} attempts",
                attempts
            ),
            SyncError::Io(e) => format!("File access failed: {}", e),
            SyncError::Serialization(e) => format!("Could not encode or decode JSON: {}", e),
            SyncError::ConfigError { message } => format!("Configuration problem: {}", message),
            SyncError::ConfigValidationError { field, message } => {
                format!("Configuration '{}' is invalid: {}", field, message)
            }
            SyncError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration '{}' is invalid: {}", field, reason)
            }
            SyncError::MissingConfigError { field } => {
                format!("Configuration '{}' is required", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::Http(_) => "Check your network connection and the configured URLs",
            SyncError::UnexpectedStatus { status, .. } if *status == 401 || *status == 403 => {
                "Delete the token file and run again to re-authorize"
            }
            SyncError::UnexpectedStatus { .. } => {
                "Check the username and list settings, then try again later"
            }
            SyncError::MalformedResponse { .. } => {
                "Make sure the source URL returns a JSON array of movies"
            }
            SyncError::AuthorizationFailed { .. } | SyncError::PollLimitReached { .. } => {
                "Run again and enter the code at the verification URL before it expires"
            }
            SyncError::Io(_) => "Check permissions on the token storage path",
            SyncError::Serialization(_) => "Delete the token file and run again",
            SyncError::ConfigError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. } => {
                "Fix the configuration file or command line arguments"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
