use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid address record: {reason}")]
    InvalidRecord { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    System,
    Configuration,
    Data,
}

impl ResolverError {
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) => ErrorCategory::Network,
            Self::Io(_) => ErrorCategory::System,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::Serialization(_) | Self::InvalidRecord { .. } => ErrorCategory::Data,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the directory service: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Http(_) => "Check the endpoint URL and your network connection",
            Self::Io(_) => "Check that the file exists and is readable",
            Self::Serialization(_) => "Check that the payload is valid JSON",
            Self::ConfigError { .. } => "Check the TOML syntax of the configuration file",
            Self::InvalidConfigValueError { .. } => "Fix the value named above and try again",
            Self::MissingConfigError { .. } => "Add the missing field to the configuration",
            Self::InvalidRecord { .. } => "Check the fallback table rows in the configuration",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
