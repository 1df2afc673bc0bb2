use thiserror::Error;

/// Fixed message carried by every non-2xx fetch failure.
pub const FETCH_FAILED_MESSAGE: &str = "Gagal mengambil data";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a status outside 200-299. The status is kept
    /// for logs only; the message never changes.
    #[error("Gagal mengambil data")]
    FetchFailed { status: reqwest::StatusCode },

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl ApiError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ApiError::ConfigError { .. }
                | ApiError::InvalidConfigValueError { .. }
                | ApiError::MissingConfigError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ApiError::FetchFailed { .. } => FETCH_FAILED_MESSAGE.to_string(),
            ApiError::Request(_) => "Could not reach the backend API".to_string(),
            ApiError::Decode(_) => "The backend API returned a malformed response".to_string(),
            ApiError::Io(e) => format!("File access failed: {}", e),
            ApiError::ConfigError { message } => format!("Invalid configuration: {}", message),
            ApiError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for '{}': {}", field, reason)
            }
            ApiError::MissingConfigError { field } => {
                format!("Missing required configuration '{}'", field)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
