use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Unrecognized email intent: {0}")]
    UnrecognizedIntent(String),

    #[error("Invalid sender for email with intent '{intent}'")]
    InvalidSender { intent: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
