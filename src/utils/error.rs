use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("{action} cancelled")]
    Cancelled { action: String },

    #[error("No {resource} with id {id}")]
    NotFound { resource: String, id: String },

    #[error("Response is missing field `{field}`")]
    MissingField { field: String },
}

pub type Result<T> = std::result::Result<T, FolioError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, timeout or body transfer problems.
    Network,
    /// The backend answered with a non-2xx status or an unexpected body.
    Server,
    /// Input rejected locally before any network call.
    Input,
    /// Local filesystem, config or session state.
    Local,
}

impl FolioError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Network,
            Self::Server { .. } | Self::MissingField { .. } | Self::Serialization(_) => {
                ErrorCategory::Server
            }
            Self::Validation { .. }
            | Self::Cancelled { .. }
            | Self::NotFound { .. }
            | Self::UploadInProgress => ErrorCategory::Input,
            Self::Io(_)
            | Self::Config { .. }
            | Self::InvalidConfigValue { .. }
            | Self::NotAuthenticated => ErrorCategory::Local,
        }
    }

    /// Message taken from the server's JSON body, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Transport(e) if e.is_timeout() => "The server took too long to answer".to_string(),
            Self::Transport(_) => "Could not reach the server".to_string(),
            Self::Server {
                message: Some(m), ..
            } => m.clone(),
            Self::Server { status, .. } => format!("The server rejected the request ({})", status),
            Self::NotAuthenticated => "You need to log in first".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Transport(_) => "Check the API URL and that the backend is running",
            Self::Server { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                "Your session may have expired, run `folio login` again"
            }
            Self::Server { .. } | Self::MissingField { .. } | Self::Serialization(_) => {
                "Check the backend logs for details"
            }
            Self::NotAuthenticated => "Run `folio login --email <email> --password <password>`",
            Self::UploadInProgress => "Wait for the current upload to finish",
            Self::Validation { .. } => "Fill in every required field",
            Self::Config { .. } | Self::InvalidConfigValue { .. } => {
                "Check the config file and FOLIO_* environment variables"
            }
            Self::Cancelled { .. } | Self::NotFound { .. } | Self::Io(_) => "Try again",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 2,
            ErrorCategory::Local => 3,
            ErrorCategory::Network => 4,
            ErrorCategory::Server => 5,
        }
    }
}
