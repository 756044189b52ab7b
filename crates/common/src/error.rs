//! Error types shared across Subcard crates.

use std::path::PathBuf;

/// Top-level error type for Subcard operations.
#[derive(Debug, thiserror::Error)]
pub enum SubcardError {
    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Font error: {message}")]
    Font { message: String },

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("Host error: {message}")]
    Host { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SubcardError.
pub type SubcardResult<T> = Result<T, SubcardError>;

impl SubcardError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font {
            message: msg.into(),
        }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output {
            message: msg.into(),
        }
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host {
            message: msg.into(),
        }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
