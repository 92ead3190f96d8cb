//! Error types shared by every missive crate

use thiserror::Error;

/// Broad classification used by callers to decide how to present a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Permission,
    DuplicateName,
    Transport,
}

#[derive(Error, Debug)]
pub enum MissiveError {
    #[error("{0}")]
    Validation(String),

    #[error("Thread ID must contain only numbers: {0:?}")]
    InvalidThreadFormat(String),

    #[error("The specified thread does not exist in this channel")]
    ThreadNotFound,

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("You need to join the channel before sending messages")]
    NotInChannel,

    #[error("Template with the same name already exists: {0}")]
    DuplicateName(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("Slack {method} failed: {code}")]
    Api { method: String, code: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MissiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidThreadFormat(_) | Self::FileExists(_) | Self::Config(_) => {
                ErrorKind::Validation
            }
            Self::ThreadNotFound | Self::ChannelNotFound(_) | Self::TemplateNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::NotInChannel => ErrorKind::Permission,
            Self::DuplicateName(_) => ErrorKind::DuplicateName,
            Self::Api { .. } | Self::Transport(_) | Self::Io(_) | Self::Json(_) => ErrorKind::Transport,
        }
    }

    /// Short headline for a notification; the `Display` output is the detail
    pub fn title(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Invalid input",
            Self::InvalidThreadFormat(_) | Self::ThreadNotFound => "Invalid thread",
            Self::ChannelNotFound(_) => "Channel not found",
            Self::TemplateNotFound(_) => "Template not found",
            Self::NotInChannel => "Not a channel member",
            Self::DuplicateName(_) => "Duplicate template name",
            Self::FileExists(_) => "File already exists",
            Self::Config(_) => "Configuration error",
            Self::Api { .. } | Self::Transport(_) => "Slack request failed",
            Self::Io(_) | Self::Json(_) => "Storage error",
        }
    }

    /// Structured Slack error code, if this error came from an `ok: false` response
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for MissiveError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MissiveError>;
